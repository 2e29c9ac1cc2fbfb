//! # Product Repository
//!
//! Menu items of each cafe.
//!
//! ## Column Mapping
//! ```text
//! ┌───────────────────┬──────────────────────────────────────────────┐
//! │ Product field     │ Column                                       │
//! ├───────────────────┼──────────────────────────────────────────────┤
//! │ category          │ TEXT slug ("hot-drinks")                     │
//! │ badges            │ TEXT JSON array of slugs                     │
//! │ nutrition         │ TEXT JSON object, NULL when absent           │
//! │ customization     │ TEXT JSON object, NULL when absent           │
//! │ created/updated   │ TEXT RFC 3339                                │
//! └───────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Search and availability filtering happen in `cafe_core::catalog` on
//! the listed rows; a cafe's menu is small enough to load whole.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use cafe_core::{Product, ProductCategory};

use super::{from_json, from_json_opt, to_json, to_json_opt};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    cafe_id: String,
    name: String,
    description: String,
    price_kurus: i64,
    category: String,
    badges: String,
    image_url: Option<String>,
    nutrition: Option<String>,
    customization: Option<String>,
    is_available: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product {
            id: row.id,
            cafe_id: row.cafe_id,
            name: row.name,
            description: row.description,
            price_kurus: row.price_kurus,
            category: row.category.parse()?,
            badges: from_json(&row.badges)?,
            image_url: row.image_url,
            nutrition: from_json_opt(row.nutrition.as_deref())?,
            customization: from_json_opt(row.customization.as_deref())?,
            is_available: row.is_available,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT
        id, cafe_id, name, description, price_kurus, category, badges,
        image_url, nutrition, customization, is_available, sort_order,
        created_at, updated_at
    FROM products
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let menu = db.products().list_by_cafe("moda-kahve", None).await?;
/// let coffee = db.products()
///     .list_by_cafe("moda-kahve", Some(ProductCategory::Coffee))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists a cafe's products, optionally one category only.
    ///
    /// Sold-out products are included; ordered by `(sort_order, name)`.
    pub async fn list_by_cafe(
        &self,
        cafe_id: &str,
        category: Option<ProductCategory>,
    ) -> DbResult<Vec<Product>> {
        let sql = format!(
            "{SELECT_PRODUCT} WHERE cafe_id = ?1 AND (?2 IS NULL OR category = ?2) \
             ORDER BY sort_order, name"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(cafe_id)
            .bind(category.map(|c| c.as_str()))
            .fetch_all(&self.pool)
            .await?;

        debug!(cafe_id, category = ?category, count = rows.len(), "Listed products");
        rows.into_iter().map(Product::try_from).collect()
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE id = ?1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// * `UniqueViolation` - id already exists
    /// * `ForeignKeyViolation` - cafe doesn't exist
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, cafe_id = %product.cafe_id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, cafe_id, name, description, price_kurus, category, badges,
                image_url, nutrition, customization, is_available, sort_order,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&product.id)
        .bind(&product.cafe_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_kurus)
        .bind(product.category.as_str())
        .bind(to_json(&product.badges)?)
        .bind(&product.image_url)
        .bind(to_json_opt(product.nutrition.as_ref())?)
        .bind(to_json_opt(product.customization.as_ref())?)
        .bind(product.is_available)
        .bind(product.sort_order)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites every editable field of an existing product.
    ///
    /// `id`, `cafe_id` and `created_at` are left as stored.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_kurus = ?4,
                category = ?5,
                badges = ?6,
                image_url = ?7,
                nutrition = ?8,
                customization = ?9,
                is_available = ?10,
                sort_order = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_kurus)
        .bind(product.category.as_str())
        .bind(to_json(&product.badges)?)
        .bind(&product.image_url)
        .bind(to_json_opt(product.nutrition.as_ref())?)
        .bind(to_json_opt(product.customization.as_ref())?)
        .bind(product.is_available)
        .bind(product.sort_order)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        debug!(id, "Deleted product");
        Ok(())
    }

    /// Number of products of a cafe.
    pub async fn count_by_cafe(&self, cafe_id: &str) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE cafe_id = ?1")
            .bind(cafe_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{db_with_cafes, now};
    use cafe_core::{Badge, Customization, OptionChoice};

    fn product(id: &str, cafe_id: &str, category: ProductCategory, sort_order: i32) -> Product {
        Product {
            id: id.to_string(),
            cafe_id: cafe_id.to_string(),
            name: format!("Ürün {id}"),
            description: String::new(),
            price_kurus: 6_500,
            category,
            badges: vec![Badge::New],
            image_url: None,
            nutrition: None,
            customization: Some(Customization {
                sizes: vec![OptionChoice::new("l", "Büyük", 1_000)],
                ..Default::default()
            }),
            is_available: true,
            sort_order,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db_with_cafes().await;
        let latte = product("latte", "cafe-a", ProductCategory::Coffee, 1);

        db.products().insert(&latte).await.unwrap();

        let found = db.products().get_by_id("latte").await.unwrap().unwrap();
        assert_eq!(found, latte);
        assert!(db.products().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_cafe_and_category() {
        let db = db_with_cafes().await;
        let repo = db.products();
        repo.insert(&product("latte", "cafe-a", ProductCategory::Coffee, 2)).await.unwrap();
        repo.insert(&product("espresso", "cafe-a", ProductCategory::Coffee, 1)).await.unwrap();
        repo.insert(&product("cake", "cafe-a", ProductCategory::Desserts, 1)).await.unwrap();
        repo.insert(&product("simit", "cafe-b", ProductCategory::Bakery, 1)).await.unwrap();

        let ids = |ps: Vec<Product>| ps.into_iter().map(|p| p.id).collect::<Vec<_>>();

        assert_eq!(
            ids(repo.list_by_cafe("cafe-a", None).await.unwrap()),
            vec!["cake", "espresso", "latte"]
        );
        assert_eq!(
            ids(repo.list_by_cafe("cafe-a", Some(ProductCategory::Coffee)).await.unwrap()),
            vec!["espresso", "latte"]
        );
        assert_eq!(repo.count_by_cafe("cafe-b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_cafe_rejected() {
        let db = db_with_cafes().await;
        let err = db
            .products()
            .insert(&product("ghost", "no-such-cafe", ProductCategory::Tea, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = db_with_cafes().await;
        let repo = db.products();
        let mut latte = product("latte", "cafe-a", ProductCategory::Coffee, 1);
        repo.insert(&latte).await.unwrap();

        latte.price_kurus = 7_000;
        latte.is_available = false;
        latte.customization = None;
        repo.update(&latte).await.unwrap();

        let found = repo.get_by_id("latte").await.unwrap().unwrap();
        assert_eq!(found.price_kurus, 7_000);
        assert!(!found.is_available);
        assert!(found.customization.is_none());

        repo.delete("latte").await.unwrap();
        assert!(repo.delete("latte").await.unwrap_err().is_not_found());
        assert!(repo.update(&latte).await.unwrap_err().is_not_found());
    }
}
