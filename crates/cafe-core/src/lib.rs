//! # cafe-core: Pure Business Logic for Cafe Order
//!
//! This crate holds every rule of the ordering flow as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cafe Order Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile frontend / CLI                        │   │
//! │  │    QR scan ──► Splash ──► Menu ──► Cart ──► Checkout            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             cafe-app commands  /  cafe-api routes               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ catalog │ │  promo  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌────────────┐ ┌─────────┐           │   │
//! │  │   │   qr    │ │ preload │ │ validation │ │  demo   │           │   │
//! │  │   └─────────┘ └─────────┘ └────────────┘ └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Cafe, Product, Order, PromoCode, ...)
//! - [`money`] - Money in kuruş with TRY formatting and parsing
//! - [`cart`] - Cart lines, customization pricing, totals
//! - [`catalog`] - Menu search, category filtering, grouping
//! - [`promo`] - Promo code validity and discount math
//! - [`qr`] - QR payload / demo code parsing and cafe resolution
//! - [`preload`] - Splash screen stage weights and progress
//! - [`validation`] - Form validation
//! - [`wire`] - REST request/response bodies shared by server and client
//! - [`demo`] - Hardcoded demo payloads used when the backend is unreachable
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::money::Money;
//!
//! let latte = Money::from_kurus(8_500); // 85,00 TL
//! let total = latte * 2i64;
//! assert_eq!(total.format_try(), "₺170,00");
//! assert_eq!(Money::parse_display("₺170,00").unwrap(), total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod demo;
pub mod error;
pub mod money;
pub mod preload;
pub mod promo;
pub mod qr;
pub mod types;
pub mod validation;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{
    AppliedPromo, Cart, CartItem, CartTotals, CheckoutDetails, OptionGroup, OptionSelection,
    SelectedOption,
};
pub use catalog::{MenuSection, ProductFilter};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use preload::{PreloadPlan, PreloadProgress, PreloadStage};
pub use promo::PromoRejection;
pub use qr::{QrError, ScanTarget};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 50;

/// Maximum quantity of a single cart line.
///
/// A cafe order of 100 lattes is a typo, not an order.
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Number of orders kept in the device-local order history.
pub const ORDER_HISTORY_LIMIT: usize = 50;

/// ISO 4217 code of the only currency the network trades in.
pub const CURRENCY_CODE: &str = "TRY";
