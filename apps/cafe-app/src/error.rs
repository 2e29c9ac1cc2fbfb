//! # API Error Type
//!
//! Unified error type for app commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cafe Order                             │
//! │                                                                         │
//! │  Command Function  →  Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── QrError       (bad scan, closed cafe)    ─┐                 │
//! │         ├── CoreError     (cart rules, promo, minimum)├──► ApiError     │
//! │         ├── ClientError   (API answered with an error)│   { code,       │
//! │         ├── DbError       (device database)           │     message }   │
//! │         └── SettingsError (bad settings file)        ─┘                 │
//! │                                                                         │
//! │  Reads never get here on a network failure: CatalogService answers     │
//! │  them from the demo catalog first.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! { "code": "PROMO_REJECTED", "message": "Promo code KAHVE20 rejected: ..." }
//! ```

use serde::Serialize;

use cafe_client::ClientError;
use cafe_core::{CoreError, QrError, ValidationError};
use cafe_db::DbError;

use crate::settings::SettingsError;

/// Error returned from app commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Not signed in, or wrong phone/password
    Unauthorized,

    /// Signed in without the needed role
    Forbidden,

    /// Duplicate phone number and the like
    Conflict,

    /// The scanned payload is not a cafe code
    InvalidScan,

    /// The cafe exists but is closed
    CafeClosed,

    /// A command needs a selected cafe and there is none
    NoCafeSelected,

    /// The cafe has ordering switched off
    OrderingDisabled,

    /// Cart rule violated
    CartError,

    /// Promo code known but not usable
    PromoRejected,

    /// The API could not be reached (offline mode included)
    Network,

    /// Device database failure
    DatabaseError,

    /// Settings file missing a value or malformed
    SettingsError,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn no_cafe() -> Self {
        ApiError::new(
            ErrorCode::NoCafeSelected,
            "Scan a cafe QR code or enter a demo code first",
        )
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Device database unavailable")
            }
            other => {
                tracing::error!(error = %other, "Device database error");
                ApiError::new(ErrorCode::DatabaseError, "Device database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) | CoreError::LineNotFound(_) => ErrorCode::NotFound,
            CoreError::UnknownPromo(_) => ErrorCode::NotFound,
            CoreError::PromoRejected { .. } => ErrorCode::PromoRejected,
            CoreError::Validation(_) | CoreError::InvalidOption { .. } => {
                ErrorCode::ValidationError
            }
            CoreError::QuantityTooLarge { .. } => ErrorCode::ValidationError,
            _ => ErrorCode::CartError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<QrError> for ApiError {
    fn from(err: QrError) -> Self {
        let code = match &err {
            QrError::Empty | QrError::InvalidPayload(_) => ErrorCode::InvalidScan,
            QrError::UnknownCafe(_) => ErrorCode::NotFound,
            QrError::CafeInactive { .. } => ErrorCode::CafeClosed,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(_) | ClientError::Offline => {
                ApiError::new(ErrorCode::Network, err.to_string())
            }
            ClientError::Api { status, message, .. } => {
                let code = match status {
                    400 | 422 => ErrorCode::ValidationError,
                    401 => ErrorCode::Unauthorized,
                    403 => ErrorCode::Forbidden,
                    404 => ErrorCode::NotFound,
                    409 => ErrorCode::Conflict,
                    _ => ErrorCode::Network,
                };
                ApiError::new(code, message)
            }
            ClientError::Unauthorized(message) => ApiError::unauthorized(message),
            ClientError::NotFound(what) => ApiError::new(ErrorCode::NotFound, what),
            ClientError::Validation(e) => e.into(),
            ClientError::PromoRejected { .. } => {
                ApiError::new(ErrorCode::PromoRejected, err.to_string())
            }
            ClientError::Parse(message) => {
                tracing::error!(%message, "Unreadable API response");
                ApiError::internal("Unexpected response from the server")
            }
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        ApiError::new(ErrorCode::SettingsError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
