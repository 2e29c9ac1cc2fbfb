//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary
//! and applied by `Database::new`. Server and device databases share them.
//!
//! ```text
//! 001_initial_schema.sql   cafes, products, promotional_cards,
//!                          app_configs, video_presets, users, orders,
//!                          promo_codes, kv
//! ```
//!
//! A schema change is a new `NNN_description.sql` file; applied files are
//! checksummed by sqlx and must stay untouched.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever has not been applied yet, each file in its own
/// transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(known = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}

/// `(known, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
