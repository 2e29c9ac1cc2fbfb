//! # Error Types
//!
//! Domain-specific error types for cafe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cafe-core errors (this file)                                          │
//! │  ├── CoreError        - Cart / catalog / promo rule violations         │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  cafe-db      → DbError       (database failures)                      │
//! │  cafe-client  → ClientError   (HTTP failures, triggers demo fallback)  │
//! │  cafe-api     → AppError      (HTTP status + message)                  │
//! │  cafe-app     → ApiError      (code + message for the frontend)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::promo::PromoRejection;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not part of the catalog being looked at.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product exists but is switched off by the cafe.
    ///
    /// ## When This Occurs
    /// - Staff marked the product sold out in the admin panel
    /// - The customer's menu was loaded before the change
    #[error("{name} is currently unavailable")]
    ProductUnavailable { name: String },

    /// Product belongs to another cafe than the cart.
    #[error("Product {product_id} does not belong to cafe {cafe_id}")]
    WrongCafe { product_id: String, cafe_id: String },

    /// Cart line id not present in the cart.
    #[error("Cart line not found: {0}")]
    LineNotFound(String),

    /// Cart has reached its line limit.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Quantity exceeds the per-line limit.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Customization choice does not exist on the product.
    #[error("Option '{option_id}' is not available for {product}")]
    InvalidOption { product: String, option_id: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Order total is below the cafe's minimum.
    #[error("Minimum order is {minimum}, cart total is {total}")]
    BelowMinimumOrder { minimum: String, total: String },

    /// Promo code cannot be used.
    #[error("Promo code {code} rejected: {reason}")]
    PromoRejected { code: String, reason: PromoRejection },

    /// Promo code does not exist.
    #[error("Unknown promo code: {0}")]
    UnknownPromo(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic runs, one per offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (phone, color, url, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two options with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn format(field: &str, reason: &str) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
