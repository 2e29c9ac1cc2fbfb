//! # Commands Module
//!
//! Everything the customer and admin screens can ask for.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── onboarding.rs  ◄─── First-run flag
//! ├── cafe.rs        ◄─── QR scan, current cafe, leave
//! ├── preload.rs     ◄─── Splash preload of the selected cafe
//! ├── menu.rs        ◄─── Menu sections, search, product detail, cards
//! ├── cart.rs        ◄─── Cart manipulation, promo codes
//! ├── checkout.rs    ◄─── Checkout stub, order history
//! ├── auth.rs        ◄─── Register, login (API first, device accounts
//! │                       as fallback), logout
//! └── admin.rs       ◄─── Products, cards, app config, video presets
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the session
//! fn current_cafe(session: &SessionState) -> Option<Cafe>
//!
//! // Needs the device store and the cart
//! async fn clear_cart(db: &DbState, cart: &CartState) -> ApiResult<CartResponse>
//!
//! // Needs all four
//! async fn checkout(db, catalog, session, cart, request) -> ApiResult<CheckoutReceipt>
//! ```
//!
//! Every command returns `Result<T, ApiError>` with `T: Serialize`.

pub mod admin;
pub mod auth;
pub mod cafe;
pub mod cart;
pub mod checkout;
pub mod menu;
pub mod onboarding;
pub mod preload;
