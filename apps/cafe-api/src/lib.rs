//! # Cafe API
//!
//! REST server for the cafe network: catalog reads for customers, CRUD for
//! staff, phone/password accounts, promo checks and orders.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cafe API Server                                 │
//! │                                                                         │
//! │  cafe-client ───► axum (3000) ───► routes ───► cafe-db (SQLite)         │
//! │                      │                │                                 │
//! │                 TraceLayer        JwtManager                            │
//! │                 CorsLayer      (staff mutations)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is read first when present):
//! - `CAFE_API_PORT` - HTTP port (default: 3000)
//! - `CAFE_DB_PATH` - SQLite file (default: cafe_api.db)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_LIFETIME_SECS` - Token lifetime (default: 86400)
//! - `CAFE_SEED_DEMO` - Load the demo network on startup (default: true)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{AppError, AppResult};
pub use routes::router;
pub use state::AppState;
