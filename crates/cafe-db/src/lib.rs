//! # cafe-db: Storage Layer for Cafe Order
//!
//! SQLite storage via sqlx. The REST server keeps the whole network here;
//! the customer app keeps its key-value blobs and offline accounts here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cafe Order Data Flow                             │
//! │                                                                         │
//! │  cafe-api route handler          cafe-app command                      │
//! │       │                                │                                │
//! │       ▼                                ▼                                │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cafe-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CafeRepo      │    │ 001_initial_ │  │   │
//! │  │   │ DbConfig      │    │ ProductRepo   │    │ schema.sql   │  │   │
//! │  │   │               │    │ OrderRepo ... │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           ▲                                                     │   │
//! │  │           └──────────── KvStore (device blobs)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cafe.db (server: CAFE_DB_PATH, app: platform data dir)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//! - [`kv`] - JSON key-value store
//! - [`password`] - Argon2 password hashing
//! - [`seed`] - Demo network loader
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cafe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/cafe.db")).await?;
//! let cafe = db.cafes().get_by_qr_code("MODA01").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use kv::KvStore;
pub use password::{hash_password, verify_password};
pub use pool::{Database, DbConfig};
pub use seed::{seed_demo, SeedReport};

pub use repository::{
    AppConfigRepository, CafeRepository, OrderRepository, ProductRepository,
    PromoCodeRepository, PromotionalCardRepository, UserRepository, VideoPresetRepository,
};
