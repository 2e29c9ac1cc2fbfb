//! # App Config Repository
//!
//! One branding row per cafe, keyed by `cafe_id`. Writes are upserts.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use cafe_core::AppConfig;

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct AppConfigRow {
    cafe_id: String,
    primary_color: String,
    accent_color: String,
    logo_url: Option<String>,
    welcome_message: String,
    ordering_enabled: bool,
    min_order_kurus: i64,
    featured_category: Option<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AppConfigRow> for AppConfig {
    type Error = DbError;

    fn try_from(row: AppConfigRow) -> DbResult<Self> {
        Ok(AppConfig {
            cafe_id: row.cafe_id,
            primary_color: row.primary_color,
            accent_color: row.accent_color,
            logo_url: row.logo_url,
            welcome_message: row.welcome_message,
            ordering_enabled: row.ordering_enabled,
            min_order_kurus: row.min_order_kurus,
            featured_category: row.featured_category.map(|c| c.parse()).transpose()?,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfigRepository {
    pool: SqlitePool,
}

impl AppConfigRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AppConfigRepository { pool }
    }

    /// Stored config of a cafe. Callers fall back to
    /// [`AppConfig::default_for`] on `None`.
    pub async fn get(&self, cafe_id: &str) -> DbResult<Option<AppConfig>> {
        let row = sqlx::query_as::<_, AppConfigRow>(
            r#"
            SELECT
                cafe_id, primary_color, accent_color, logo_url, welcome_message,
                ordering_enabled, min_order_kurus, featured_category, updated_at
            FROM app_configs
            WHERE cafe_id = ?1
            "#,
        )
        .bind(cafe_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AppConfig::try_from).transpose()
    }

    /// Inserts or replaces the config of `config.cafe_id`.
    pub async fn upsert(&self, config: &AppConfig) -> DbResult<()> {
        debug!(cafe_id = %config.cafe_id, "Saving app config");

        sqlx::query(
            r#"
            INSERT INTO app_configs (
                cafe_id, primary_color, accent_color, logo_url, welcome_message,
                ordering_enabled, min_order_kurus, featured_category, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT (cafe_id) DO UPDATE SET
                primary_color = excluded.primary_color,
                accent_color = excluded.accent_color,
                logo_url = excluded.logo_url,
                welcome_message = excluded.welcome_message,
                ordering_enabled = excluded.ordering_enabled,
                min_order_kurus = excluded.min_order_kurus,
                featured_category = excluded.featured_category,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&config.cafe_id)
        .bind(&config.primary_color)
        .bind(&config.accent_color)
        .bind(&config.logo_url)
        .bind(&config.welcome_message)
        .bind(config.ordering_enabled)
        .bind(config.min_order_kurus)
        .bind(config.featured_category.map(|c| c.as_str()))
        .bind(config.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{db_with_cafes, now};
    use cafe_core::ProductCategory;

    #[tokio::test]
    async fn test_missing_config_is_none() {
        let db = db_with_cafes().await;
        assert!(db.app_configs().get("cafe-a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let db = db_with_cafes().await;
        let repo = db.app_configs();

        let mut config = AppConfig::default_for("cafe-a", now());
        repo.upsert(&config).await.unwrap();

        config.min_order_kurus = 5_000;
        config.featured_category = Some(ProductCategory::Desserts);
        config.ordering_enabled = false;
        repo.upsert(&config).await.unwrap();

        assert_eq!(repo.get("cafe-a").await.unwrap().unwrap(), config);
    }

    #[tokio::test]
    async fn test_config_for_unknown_cafe_rejected() {
        let db = db_with_cafes().await;
        let err = db
            .app_configs()
            .upsert(&AppConfig::default_for("ghost", now()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
