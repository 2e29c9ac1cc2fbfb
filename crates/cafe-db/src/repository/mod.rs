//! # Repository Module
//!
//! One repository per table, each a thin handle around a pool clone.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Route handler / app command                                           │
//! │       │                                                                 │
//! │       │  db.products().list_by_cafe("moda-kahve", None)                │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list_by_cafe / get_by_id                                          │
//! │  ├── insert / update / delete                                          │
//! │       │                                                                 │
//! │       │  SQL via sqlx::query_as::<_, ProductRow>                        │
//! │       ▼                                                                 │
//! │  ProductRow ──TryFrom──► cafe_core::Product                            │
//! │  (flat columns, JSON text for nested values)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CafeRepository`] - Cafes and QR code lookup
//! - [`ProductRepository`] - Menu items
//! - [`PromotionalCardRepository`] - Carousel cards
//! - [`AppConfigRepository`] - Per-cafe branding
//! - [`VideoPresetRepository`] - Background video presets
//! - [`UserRepository`] - Accounts
//! - [`OrderRepository`] - Placed orders
//! - [`PromoCodeRepository`] - Discount codes

pub mod app_config;
pub mod cafe;
pub mod order;
pub mod product;
pub mod promo_card;
pub mod promo_code;
pub mod user;
pub mod video_preset;

pub use app_config::AppConfigRepository;
pub use cafe::CafeRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use promo_card::PromotionalCardRepository;
pub use promo_code::PromoCodeRepository;
pub use user::UserRepository;
pub use video_preset::VideoPresetRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DbResult;

/// Encodes a nested value for a JSON text column.
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> DbResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes a JSON text column.
pub(crate) fn from_json<T: DeserializeOwned>(text: &str) -> DbResult<T> {
    Ok(serde_json::from_str(text)?)
}

pub(crate) fn to_json_opt<T: Serialize>(value: Option<&T>) -> DbResult<Option<String>> {
    value.map(to_json).transpose()
}

pub(crate) fn from_json_opt<T: DeserializeOwned>(text: Option<&str>) -> DbResult<Option<T>> {
    text.map(from_json).transpose()
}
