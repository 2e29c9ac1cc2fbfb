//! # Key-Value Store
//!
//! Device-local blobs for the customer app: session, selected cafe, cart,
//! order history. Every value is JSON text under a string key.
//!
//! ```text
//! ┌──────────────────────┬────────────────────────────────────────────┐
//! │ key                  │ value                                      │
//! ├──────────────────────┼────────────────────────────────────────────┤
//! │ auth_state           │ {"user":{...},"token":"..."}               │
//! │ selected_cafe        │ {"id":"moda-kahve",...}                    │
//! │ cart                 │ {"cafeId":"moda-kahve","items":[...]}      │
//! │ order_history        │ [{...newest...}, ...]                      │
//! └──────────────────────┴────────────────────────────────────────────┘
//! ```
//!
//! There is no schema versioning. A blob that no longer decodes surfaces
//! as [`DbError::Serialization`]; callers usually drop it and start over.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    pub fn new(pool: SqlitePool) -> Self {
        KvStore { pool }
    }

    /// Raw JSON text under `key`.
    pub async fn get_raw(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    pub async fn set_raw(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    /// Decodes the value under `key`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
                warn!(key, error = %e, "Stored value does not decode");
                DbError::from(e)
            }),
            None => Ok(None),
        }
    }

    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let text = serde_json::to_string(value)?;
        self.set_raw(key, &text).await
    }

    /// Like [`get_json`](Self::get_json), but a blob that fails to decode
    /// is deleted and read as missing.
    pub async fn get_json_or_discard<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get_json(key).await {
            Err(DbError::Serialization(_)) => {
                self.remove(key).await?;
                Ok(None)
            }
            other => other,
        }
    }

    /// Removes `key`. Missing keys are fine.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        debug!(key, "Removed value");
        Ok(())
    }

    pub async fn contains(&self, key: &str) -> DbResult<bool> {
        Ok(self.get_raw(key).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Session {
        user_id: String,
        token: String,
    }

    #[tokio::test]
    async fn test_typed_round_trip_and_overwrite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        let first = Session {
            user_id: "u1".to_string(),
            token: "t1".to_string(),
        };
        kv.set_json("auth_state", &first).await.unwrap();
        assert_eq!(kv.get_json::<Session>("auth_state").await.unwrap(), Some(first));

        let second = Session {
            user_id: "u2".to_string(),
            token: "t2".to_string(),
        };
        kv.set_json("auth_state", &second).await.unwrap();
        assert_eq!(kv.get_json::<Session>("auth_state").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_remove_and_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        assert_eq!(kv.get_json::<bool>("onboarding_complete").await.unwrap(), None);
        kv.set_json("onboarding_complete", &true).await.unwrap();
        assert!(kv.contains("onboarding_complete").await.unwrap());

        kv.remove("onboarding_complete").await.unwrap();
        kv.remove("onboarding_complete").await.unwrap();
        assert!(!kv.contains("onboarding_complete").await.unwrap());
    }

    #[tokio::test]
    async fn test_stale_blob_is_discarded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();
        kv.set_raw("auth_state", "{\"old\":true}").await.unwrap();

        assert!(matches!(
            kv.get_json::<Session>("auth_state").await,
            Err(DbError::Serialization(_))
        ));
        assert_eq!(kv.get_json_or_discard::<Session>("auth_state").await.unwrap(), None);
        assert!(!kv.contains("auth_state").await.unwrap());
    }
}
