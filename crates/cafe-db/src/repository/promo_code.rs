//! # Promo Code Repository
//!
//! Codes are matched without regard to case. Validity (window, limit,
//! minimum) is judged by `cafe_core::promo`, not here.
//!
//! ## Redemption
//! `increment_usage` is a plain `usage_count + 1`. Checking the limit and
//! counting the use are separate calls, so two customers can both redeem
//! the last use of a limited code.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use cafe_core::PromoCode;

use super::{from_json, to_json};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct PromoCodeRow {
    id: String,
    code: String,
    discount: String,
    max_discount_kurus: Option<i64>,
    min_order_kurus: i64,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    usage_limit: Option<i64>,
    usage_count: i64,
    is_active: bool,
}

impl TryFrom<PromoCodeRow> for PromoCode {
    type Error = DbError;

    fn try_from(row: PromoCodeRow) -> DbResult<Self> {
        Ok(PromoCode {
            id: row.id,
            code: row.code,
            discount: from_json(&row.discount)?,
            max_discount_kurus: row.max_discount_kurus,
            min_order_kurus: row.min_order_kurus,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            usage_limit: row.usage_limit,
            usage_count: row.usage_count,
            is_active: row.is_active,
        })
    }
}

const SELECT_PROMO: &str = r#"
    SELECT
        id, code, discount, max_discount_kurus, min_order_kurus, valid_from,
        valid_until, usage_limit, usage_count, is_active
    FROM promo_codes
"#;

#[derive(Debug, Clone)]
pub struct PromoCodeRepository {
    pool: SqlitePool,
}

impl PromoCodeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PromoCodeRepository { pool }
    }

    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<PromoCode>> {
        let sql = format!("{SELECT_PROMO} WHERE code = ?1 COLLATE NOCASE");
        let row = sqlx::query_as::<_, PromoCodeRow>(&sql)
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await?;

        debug!(code = %code.trim(), found = row.is_some(), "Promo code lookup");
        row.map(PromoCode::try_from).transpose()
    }

    pub async fn list(&self) -> DbResult<Vec<PromoCode>> {
        let sql = format!("{SELECT_PROMO} ORDER BY code");
        let rows = sqlx::query_as::<_, PromoCodeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(PromoCode::try_from).collect()
    }

    pub async fn insert(&self, promo: &PromoCode) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO promo_codes (
                id, code, discount, max_discount_kurus, min_order_kurus,
                valid_from, valid_until, usage_limit, usage_count, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&promo.id)
        .bind(&promo.code)
        .bind(to_json(&promo.discount)?)
        .bind(promo.max_discount_kurus)
        .bind(promo.min_order_kurus)
        .bind(promo.valid_from)
        .bind(promo.valid_until)
        .bind(promo.usage_limit)
        .bind(promo.usage_count)
        .bind(promo.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.contains("code") => {
                DbError::duplicate("code", &promo.code)
            }
            other => other,
        })?;

        debug!(code = %promo.code, "Inserted promo code");
        Ok(())
    }

    /// Counts one redemption.
    pub async fn increment_usage(&self, id: &str) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE promo_codes SET usage_count = usage_count + 1 WHERE id = ?1")
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PromoCode", id));
        }
        info!(id, "Promo code redeemed");
        Ok(())
    }
}
