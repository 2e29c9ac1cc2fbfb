//! # Cafe App Library
//!
//! The customer and admin application layer: state, commands and device
//! storage. The `cafe` binary drives it from the command line; a UI shell
//! would call the same commands.
//!
//! ## Module Organization
//! ```text
//! cafe_app_lib/
//! ├── lib.rs          ◄─── You are here (AppContext, tracing)
//! ├── settings.rs     ◄─── AppSettings (TOML + env overrides)
//! ├── storage.rs      ◄─── Device store keys, order history
//! ├── preload.rs      ◄─── Staged cafe preload with progress
//! ├── state/
//! │   ├── db.rs       ◄─── Device database
//! │   ├── cart.rs     ◄─── Cart (Arc<Mutex<Cart>>)
//! │   ├── session.rs  ◄─── Selected cafe, signed-in user
//! │   └── catalog.rs  ◄─── CatalogService (API or demo)
//! ├── commands/       ◄─── onboarding, cafe, preload, menu, cart,
//! │                        checkout, auth, admin
//! └── error.rs        ◄─── ApiError for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()           RUST_LOG or info,cafe=debug,sqlx=warn      │
//! │  2. AppSettings::load()      settings.toml + CAFE_* overrides           │
//! │  3. AppContext::open()                                                  │
//! │       • device database at <data dir>/cafe.db (WAL, migrations)        │
//! │       • CatalogService from the settings (offline / fallback flags)    │
//! │       • SessionState restored from selected_cafe, auth_state           │
//! │       • CartState restored from cart, if it matches the cafe           │
//! │  4. run a command                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod preload;
pub mod settings;
pub mod state;
pub mod storage;

use std::fs;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cafe_client::CatalogService;
use cafe_db::{Database, DbConfig};

pub use error::{ApiError, ApiResult, ErrorCode};
pub use settings::{AppSettings, SettingsError};
use state::{CartState, CatalogState, DbState, SessionState};

/// Every state object, built once per process.
pub struct AppContext {
    pub settings: AppSettings,
    pub db: DbState,
    pub cart: CartState,
    pub session: SessionState,
    pub catalog: CatalogState,
}

impl AppContext {
    /// Opens the device database named by the settings and restores state.
    pub async fn open(settings: AppSettings) -> ApiResult<Self> {
        let data_dir = settings.data_dir();
        fs::create_dir_all(&data_dir).map_err(|e| {
            ApiError::internal(format!("Cannot create {}: {}", data_dir.display(), e))
        })?;

        let db_path = settings.database_path();
        info!(db_path = %db_path.display(), offline = settings.offline, "Opening device database");
        let db = Database::new(DbConfig::new(db_path)).await?;

        let service = CatalogService::new(settings.client_config())?;
        Self::with_parts(settings, db, service).await
    }

    /// Builds the context from an open database and a catalog service.
    pub async fn with_parts(
        settings: AppSettings,
        db: Database,
        service: CatalogService,
    ) -> ApiResult<Self> {
        let db = DbState::new(db);
        let kv = db.kv();

        let session = SessionState::restore(&kv).await?;
        let cart = CartState::restore(&kv, session.cafe_id().as_deref()).await?;

        Ok(AppContext {
            settings,
            db,
            cart,
            session,
            catalog: CatalogState::new(service),
        })
    }

    pub async fn close(&self) {
        self.db.inner().close().await;
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cafe=trace` - Show trace for cafe crates only
/// - Default: `info,cafe=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cafe=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Context over an in-memory database and a private offline demo catalog.
#[cfg(test)]
pub(crate) async fn test_context() -> AppContext {
    use cafe_client::DemoCatalog;

    let settings = AppSettings {
        offline: true,
        ..AppSettings::default()
    };
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let service = CatalogService::with_demo(settings.client_config(), DemoCatalog::new()).unwrap();
    AppContext::with_parts(settings, db, service).await.unwrap()
}
