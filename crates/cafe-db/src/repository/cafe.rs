//! # Cafe Repository
//!
//! Cafes are the tenants: every other catalog table hangs off `cafes.id`.
//! Table QR codes are unique without regard to case.

use sqlx::SqlitePool;
use tracing::debug;

use cafe_core::{Cafe, VideoConfig};

use super::{from_json, to_json};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct CafeRow {
    id: String,
    name: String,
    location: String,
    categories: String,
    video: String,
    qr_code: String,
    is_active: bool,
}

impl TryFrom<CafeRow> for Cafe {
    type Error = DbError;

    fn try_from(row: CafeRow) -> DbResult<Self> {
        Ok(Cafe {
            id: row.id,
            name: row.name,
            location: row.location,
            categories: from_json(&row.categories)?,
            video: from_json(&row.video)?,
            qr_code: row.qr_code,
            is_active: row.is_active,
        })
    }
}

const SELECT_CAFE: &str = r#"
    SELECT id, name, location, categories, video, qr_code, is_active
    FROM cafes
"#;

/// Repository for cafe database operations.
#[derive(Debug, Clone)]
pub struct CafeRepository {
    pool: SqlitePool,
}

impl CafeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CafeRepository { pool }
    }

    /// Lists cafes by name. Inactive cafes are included unless `active_only`.
    pub async fn list(&self, active_only: bool) -> DbResult<Vec<Cafe>> {
        let sql = format!(
            "{SELECT_CAFE} WHERE (?1 = 0 OR is_active = 1) ORDER BY name"
        );
        let rows = sqlx::query_as::<_, CafeRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), active_only, "Listed cafes");
        rows.into_iter().map(Cafe::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Cafe>> {
        let sql = format!("{SELECT_CAFE} WHERE id = ?1");
        let row = sqlx::query_as::<_, CafeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Cafe::try_from).transpose()
    }

    /// Looks a cafe up by the code printed on its tables.
    pub async fn get_by_qr_code(&self, code: &str) -> DbResult<Option<Cafe>> {
        let sql = format!("{SELECT_CAFE} WHERE qr_code = ?1 COLLATE NOCASE");
        let row = sqlx::query_as::<_, CafeRow>(&sql)
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Cafe::try_from).transpose()
    }

    pub async fn insert(&self, cafe: &Cafe) -> DbResult<()> {
        debug!(id = %cafe.id, qr_code = %cafe.qr_code, "Inserting cafe");

        sqlx::query(
            r#"
            INSERT INTO cafes (id, name, location, categories, video, qr_code, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&cafe.id)
        .bind(&cafe.name)
        .bind(&cafe.location)
        .bind(to_json(&cafe.categories)?)
        .bind(to_json(&cafe.video)?)
        .bind(&cafe.qr_code)
        .bind(cafe.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.contains("qr_code") => {
                DbError::duplicate("qr_code", &cafe.qr_code)
            }
            DbError::UniqueViolation { .. } => DbError::duplicate("id", &cafe.id),
            other => other,
        })?;

        Ok(())
    }

    /// Replaces a cafe's background video.
    pub async fn update_video(&self, cafe_id: &str, video: &VideoConfig) -> DbResult<()> {
        let result = sqlx::query("UPDATE cafes SET video = ?1 WHERE id = ?2")
            .bind(to_json(video)?)
            .bind(cafe_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cafe", cafe_id));
        }
        debug!(cafe_id, preset_id = ?video.preset_id, "Updated cafe video");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{cafe, db_with_cafes};

    #[tokio::test]
    async fn test_get_by_id_round_trips_json_columns() {
        let db = db_with_cafes().await;

        let found = db.cafes().get_by_id("cafe-a").await.unwrap().unwrap();
        assert_eq!(found, cafe("cafe-a", "AAA01"));
        assert!(db.cafes().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_qr_lookup_ignores_case() {
        let db = db_with_cafes().await;

        let found = db.cafes().get_by_qr_code(" bbb02 ").await.unwrap().unwrap();
        assert_eq!(found.id, "cafe-b");
    }

    #[tokio::test]
    async fn test_duplicate_qr_code_rejected() {
        let db = db_with_cafes().await;

        let err = db.cafes().insert(&cafe("cafe-c", "aaa01")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "qr_code"));
    }

    #[tokio::test]
    async fn test_list_active_only() {
        let db = db_with_cafes().await;
        let mut closed = cafe("cafe-z", "ZZZ09");
        closed.is_active = false;
        db.cafes().insert(&closed).await.unwrap();

        assert_eq!(db.cafes().list(false).await.unwrap().len(), 3);
        let open: Vec<String> = db
            .cafes()
            .list(true)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(open, vec!["cafe-a", "cafe-b"]);
    }

    #[tokio::test]
    async fn test_update_video() {
        let db = db_with_cafes().await;
        let video = VideoConfig {
            preset_id: Some("preset-x".to_string()),
            url: "https://cdn.example.com/x.mp4".to_string(),
            ..VideoConfig::default()
        };

        db.cafes().update_video("cafe-a", &video).await.unwrap();
        let found = db.cafes().get_by_id("cafe-a").await.unwrap().unwrap();
        assert_eq!(found.video, video);

        let err = db.cafes().update_video("nope", &video).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
