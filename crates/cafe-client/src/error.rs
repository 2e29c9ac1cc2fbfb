//! # Client Error Types
//!
//! ## Where Errors Go
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ApiClient call fails                                                  │
//! │       │                                                                 │
//! │       ├── read (cafes, menu, cards, config, videos, promo check)       │
//! │       │      └──► warn! + answer from DemoCatalog (DataSource::Demo)   │
//! │       │                                                                 │
//! │       └── auth / order submit                                          │
//! │              └──► returned to the caller (cafe-app decides)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Every failure is treated the same way: no retry and no distinction
//! between transient and permanent errors.

use cafe_core::{PromoRejection, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: refused, DNS, TLS, timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error: {status} {code} - {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// 401 from the API, or an admin call made without a token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 404 from the API or a missing demo record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 2xx with a body that does not decode.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Offline mode is on; no request was made.
    #[error("Offline mode: the API is not contacted")]
    Offline,

    /// Promo code known but not usable.
    #[error("Promo code {code} rejected: {reason}")]
    PromoRejected {
        code: String,
        reason: PromoRejection,
    },
}

impl ClientError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ClientError::NotFound(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// True when the server was never reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Offline)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
