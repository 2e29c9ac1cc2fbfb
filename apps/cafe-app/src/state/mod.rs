//! # State Module
//!
//! Application state, split into separate types so each command declares
//! exactly what it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │   DbState    │ │  CartState   │ │ SessionState │ │ CatalogState │   │
//! │  │              │ │              │ │              │ │              │   │
//! │  │  Database    │ │  Arc<Mutex<  │ │  RwLock<     │ │  Catalog-    │   │
//! │  │  (KV store,  │ │    Cart      │ │   cafe,      │ │  Service     │   │
//! │  │   users)     │ │  >>          │ │   auth >     │ │  (API/demo)  │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • CartState: Arc<Mutex<T>>, never locked across .await                │
//! │  • SessionState: RwLock, mostly read                                   │
//! │  • CatalogState: reqwest client + demo catalog, both shareable         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod db;
mod session;

pub use cart::CartState;
pub use catalog::CatalogState;
pub use db::DbState;
pub use session::{AuthState, SessionState};
