//! # cafe-client: REST Client with Demo Fallback
//!
//! The app reaches the backend only through this crate.
//!
//! ## Module Organization
//! ```text
//! cafe_client
//! ├── config        - ClientConfig (base URL, timeout, fallback switch)
//! ├── error         - ClientError
//! ├── api           - ApiClient, one method per REST route
//! ├── demo_catalog  - DemoCatalog, the demo network in memory
//! └── service       - CatalogService, API first then demo
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use cafe_client::{CatalogService, ClientConfig};
//!
//! # async fn run() -> cafe_client::ClientResult<()> {
//! let service = CatalogService::new(ClientConfig::default())?;
//! let menu = service.products("moda-kahve", None).await?;
//! println!("{} products from {:?}", menu.data.len(), menu.source);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod demo_catalog;
pub mod error;
pub mod service;

pub use api::ApiClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use demo_catalog::DemoCatalog;
pub use error::{ClientError, ClientResult};
pub use service::{CatalogService, DataSource, Sourced};
