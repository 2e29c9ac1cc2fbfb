//! # Video Preset Repository
//!
//! Background video presets shared by every cafe.
//!
//! ## Default Preset
//! At most one row has `is_default = 1`. Saving a preset marked default
//! clears the flag on all others in the same transaction.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use cafe_core::VideoPreset;

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct VideoPresetRow {
    id: String,
    name: String,
    url: String,
    thumbnail_url: Option<String>,
    duration_secs: i64,
    is_default: bool,
}

impl TryFrom<VideoPresetRow> for VideoPreset {
    type Error = DbError;

    fn try_from(row: VideoPresetRow) -> DbResult<Self> {
        let duration_secs = u32::try_from(row.duration_secs).map_err(|_| {
            DbError::Serialization(format!("duration_secs out of range: {}", row.duration_secs))
        })?;
        Ok(VideoPreset {
            id: row.id,
            name: row.name,
            url: row.url,
            thumbnail_url: row.thumbnail_url,
            duration_secs,
            is_default: row.is_default,
        })
    }
}

const SELECT_PRESET: &str = r#"
    SELECT id, name, url, thumbnail_url, duration_secs, is_default
    FROM video_presets
"#;

#[derive(Debug, Clone)]
pub struct VideoPresetRepository {
    pool: SqlitePool,
}

impl VideoPresetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VideoPresetRepository { pool }
    }

    /// All presets, default first.
    pub async fn list(&self) -> DbResult<Vec<VideoPreset>> {
        let sql = format!("{SELECT_PRESET} ORDER BY is_default DESC, name");
        let rows = sqlx::query_as::<_, VideoPresetRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(VideoPreset::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<VideoPreset>> {
        let sql = format!("{SELECT_PRESET} WHERE id = ?1");
        let row = sqlx::query_as::<_, VideoPresetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(VideoPreset::try_from).transpose()
    }

    pub async fn get_default(&self) -> DbResult<Option<VideoPreset>> {
        let sql = format!("{SELECT_PRESET} WHERE is_default = 1 LIMIT 1");
        let row = sqlx::query_as::<_, VideoPresetRow>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        row.map(VideoPreset::try_from).transpose()
    }

    pub async fn insert(&self, preset: &VideoPreset) -> DbResult<()> {
        debug!(id = %preset.id, is_default = preset.is_default, "Inserting video preset");

        let mut tx = self.pool.begin().await?;
        if preset.is_default {
            clear_default(&mut tx).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO video_presets (id, name, url, thumbnail_url, duration_secs, is_default)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&preset.id)
        .bind(&preset.name)
        .bind(&preset.url)
        .bind(&preset.thumbnail_url)
        .bind(i64::from(preset.duration_secs))
        .bind(preset.is_default)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn update(&self, preset: &VideoPreset) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        if preset.is_default {
            clear_default(&mut tx).await?;
        }

        let result = sqlx::query(
            r#"
            UPDATE video_presets SET
                name = ?2,
                url = ?3,
                thumbnail_url = ?4,
                duration_secs = ?5,
                is_default = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&preset.id)
        .bind(&preset.name)
        .bind(&preset.url)
        .bind(&preset.thumbnail_url)
        .bind(i64::from(preset.duration_secs))
        .bind(preset.is_default)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the cleared default
            return Err(DbError::not_found("VideoPreset", &preset.id));
        }

        tx.commit().await?;
        debug!(id = %preset.id, "Updated video preset");
        Ok(())
    }

    /// Marks one preset as the default.
    pub async fn set_default(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        clear_default(&mut tx).await?;

        let result = sqlx::query("UPDATE video_presets SET is_default = 1 WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("VideoPreset", id));
        }

        tx.commit().await?;
        info!(id, "Default video preset changed");
        Ok(())
    }

    /// Deletes a preset. Cafes already using its URL keep playing it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM video_presets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("VideoPreset", id));
        }
        Ok(())
    }
}

async fn clear_default(tx: &mut Transaction<'_, Sqlite>) -> DbResult<()> {
    sqlx::query("UPDATE video_presets SET is_default = 0 WHERE is_default = 1")
        .execute(&mut **tx)
        .await?;
    Ok(())
}
