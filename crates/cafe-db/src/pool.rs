//! # Database Handle
//!
//! One SQLite pool per process. The same schema serves two owners:
//!
//! ```text
//! ┌────────────────────────────┐        ┌────────────────────────────┐
//! │ cafe-api                   │        │ cafe-app                   │
//! │ cafe_dev.db                │        │ <data dir>/cafe.db         │
//! │                            │        │                            │
//! │ cafes, products, cards,    │        │ kv (cart, session, order   │
//! │ app configs, presets,      │        │ history), users cached or  │
//! │ users, orders, promo codes │        │ registered offline         │
//! └─────────────┬──────────────┘        └─────────────┬──────────────┘
//!               │                                     │
//!               └──────────► Database::new ◄──────────┘
//!                              │ WAL, foreign keys, migrations
//!                              ▼
//!                   db.products() · db.users() · db.kv() ...
//!                   (repository handles, one pool clone each)
//! ```
//!
//! ## In-Memory Databases
//! `:memory:` gives every connection its own empty database, so the
//! in-memory config pins the pool to one connection that is never
//! recycled. WAL does not apply to memory databases and is skipped.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::kv::KvStore;
use crate::migrations;
use crate::repository::{
    AppConfigRepository, CafeRepository, OrderRepository, ProductRepository,
    PromoCodeRepository, PromotionalCardRepository, UserRepository, VideoPresetRepository,
};

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Pool settings for one database file.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/cafe.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Upper bound of open connections (5)
    pub max_connections: u32,

    /// Connections kept open while idle (1)
    pub min_connections: u32,

    /// How long to wait for a free connection (30 s)
    pub connect_timeout: Duration,

    /// Idle connections are closed after this (10 min). `None` never closes.
    pub idle_timeout: Option<Duration>,

    /// Apply pending migrations in `Database::new` (on)
    pub run_migrations: bool,
}

impl DbConfig {
    /// Settings for a database file, created if missing. Its parent
    /// directory must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A private, empty database that disappears with the pool. Tests use
    /// it for every repository.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Isolated and empty apart from the schema
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    pub fn is_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_PATH)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Entry point to every repository and the key-value store.
///
/// Cloning is cheap (the pool is reference counted). Repositories are
/// created per call and hold their own pool clone.
///
/// ## Usage
/// ```rust,ignore
/// let products = db.products().list_by_cafe("moda-kahve", None).await?;
/// let cart: Option<Cart> = db.kv().get_json("cart").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool.
    ///
    /// File databases run in WAL mode with `synchronous = NORMAL`. Foreign
    /// keys are switched on for every connection, since products, cards
    /// and configs cascade with their cafe.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database"
        );

        let memory = config.is_memory();
        let connect_url = if memory {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}?mode=rwc", config.database_path.display())
        };

        let mut connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        connect_options = if memory {
            connect_options.journal_mode(SqliteJournalMode::Memory)
        } else {
            connect_options.journal_mode(SqliteJournalMode::Wal)
        };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);
        if memory {
            // Dropping the only connection would drop the database
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, memory, "Database ready");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call again.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn cafes(&self) -> CafeRepository {
        CafeRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn promo_cards(&self) -> PromotionalCardRepository {
        PromotionalCardRepository::new(self.pool.clone())
    }

    pub fn app_configs(&self) -> AppConfigRepository {
        AppConfigRepository::new(self.pool.clone())
    }

    pub fn video_presets(&self) -> VideoPresetRepository {
        VideoPresetRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn promo_codes(&self) -> PromoCodeRepository {
        PromoCodeRepository::new(self.pool.clone())
    }

    /// Device-local key-value store.
    pub fn kv(&self) -> KvStore {
        KvStore::new(self.pool.clone())
    }

    /// Waits for checked-out connections and closes the pool. Later
    /// queries fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// `SELECT 1` round trip.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.kv().set_json("onboarding_complete", &true).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let done: Option<bool> = db.kv().get_json("onboarding_complete").await.unwrap();
        assert_eq!(done, Some(true));
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_memory());
        assert!(DbConfig::in_memory().is_memory());
    }
}
