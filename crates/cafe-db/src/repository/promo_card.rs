//! # Promotional Card Repository
//!
//! Banner cards for the menu carousel. `target` is stored as its tagged
//! JSON form (`{"type":"product","id":"..."}`).

use sqlx::SqlitePool;
use tracing::debug;

use cafe_core::PromotionalCard;

use super::{from_json, to_json};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: String,
    cafe_id: String,
    title: String,
    subtitle: Option<String>,
    image_url: Option<String>,
    background_color: String,
    cta_label: Option<String>,
    target: String,
    sort_order: i32,
    is_active: bool,
}

impl TryFrom<CardRow> for PromotionalCard {
    type Error = DbError;

    fn try_from(row: CardRow) -> DbResult<Self> {
        Ok(PromotionalCard {
            id: row.id,
            cafe_id: row.cafe_id,
            title: row.title,
            subtitle: row.subtitle,
            image_url: row.image_url,
            background_color: row.background_color,
            cta_label: row.cta_label,
            target: from_json(&row.target)?,
            sort_order: row.sort_order,
            is_active: row.is_active,
        })
    }
}

const SELECT_CARD: &str = r#"
    SELECT
        id, cafe_id, title, subtitle, image_url, background_color,
        cta_label, target, sort_order, is_active
    FROM promotional_cards
"#;

#[derive(Debug, Clone)]
pub struct PromotionalCardRepository {
    pool: SqlitePool,
}

impl PromotionalCardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PromotionalCardRepository { pool }
    }

    /// Lists a cafe's cards by `sort_order`.
    ///
    /// Customers see active cards only; the admin screen passes
    /// `active_only = false`.
    pub async fn list_by_cafe(
        &self,
        cafe_id: &str,
        active_only: bool,
    ) -> DbResult<Vec<PromotionalCard>> {
        let sql = format!(
            "{SELECT_CARD} WHERE cafe_id = ?1 AND (?2 = 0 OR is_active = 1) \
             ORDER BY sort_order, title"
        );
        let rows = sqlx::query_as::<_, CardRow>(&sql)
            .bind(cafe_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        debug!(cafe_id, count = rows.len(), "Listed promotional cards");
        rows.into_iter().map(PromotionalCard::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PromotionalCard>> {
        let sql = format!("{SELECT_CARD} WHERE id = ?1");
        let row = sqlx::query_as::<_, CardRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PromotionalCard::try_from).transpose()
    }

    pub async fn insert(&self, card: &PromotionalCard) -> DbResult<()> {
        debug!(id = %card.id, cafe_id = %card.cafe_id, "Inserting promotional card");

        sqlx::query(
            r#"
            INSERT INTO promotional_cards (
                id, cafe_id, title, subtitle, image_url, background_color,
                cta_label, target, sort_order, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&card.id)
        .bind(&card.cafe_id)
        .bind(&card.title)
        .bind(&card.subtitle)
        .bind(&card.image_url)
        .bind(&card.background_color)
        .bind(&card.cta_label)
        .bind(to_json(&card.target)?)
        .bind(card.sort_order)
        .bind(card.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, card: &PromotionalCard) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE promotional_cards SET
                title = ?2,
                subtitle = ?3,
                image_url = ?4,
                background_color = ?5,
                cta_label = ?6,
                target = ?7,
                sort_order = ?8,
                is_active = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&card.id)
        .bind(&card.title)
        .bind(&card.subtitle)
        .bind(&card.image_url)
        .bind(&card.background_color)
        .bind(&card.cta_label)
        .bind(to_json(&card.target)?)
        .bind(card.sort_order)
        .bind(card.is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PromotionalCard", &card.id));
        }
        debug!(id = %card.id, "Updated promotional card");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM promotional_cards WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PromotionalCard", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::db_with_cafes;
    use cafe_core::CardTarget;

    fn card(id: &str, sort_order: i32, active: bool) -> PromotionalCard {
        PromotionalCard {
            id: id.to_string(),
            cafe_id: "cafe-a".to_string(),
            title: format!("Kampanya {id}"),
            subtitle: Some("Bugüne özel".to_string()),
            image_url: None,
            background_color: "#6F4E37".to_string(),
            cta_label: Some("İncele".to_string()),
            target: CardTarget::Category {
                slug: "desserts".to_string(),
            },
            sort_order,
            is_active: active,
        }
    }

    #[tokio::test]
    async fn test_list_respects_order_and_activity() {
        let db = db_with_cafes().await;
        let repo = db.promo_cards();
        repo.insert(&card("second", 2, true)).await.unwrap();
        repo.insert(&card("first", 1, true)).await.unwrap();
        repo.insert(&card("hidden", 0, false)).await.unwrap();

        let visible: Vec<String> = repo
            .list_by_cafe("cafe-a", true)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(visible, vec!["first", "second"]);
        assert_eq!(repo.list_by_cafe("cafe-a", false).await.unwrap().len(), 3);
        assert!(repo.list_by_cafe("cafe-b", false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_target() {
        let db = db_with_cafes().await;
        let repo = db.promo_cards();
        let mut c = card("c1", 1, true);
        repo.insert(&c).await.unwrap();

        c.target = CardTarget::Url {
            href: "https://example.com/kampanya".to_string(),
        };
        repo.update(&c).await.unwrap();
        assert_eq!(repo.get_by_id("c1").await.unwrap().unwrap(), c);

        repo.delete("c1").await.unwrap();
        assert!(repo.get_by_id("c1").await.unwrap().is_none());
    }
}
