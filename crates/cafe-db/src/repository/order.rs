//! # Order Repository
//!
//! Placed orders. Items are frozen at checkout and stored as one JSON
//! array; an order is never edited apart from its status.
//!
//! ## Status
//! Any status may be written over any other. Nothing here enforces a
//! lifecycle.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use cafe_core::{Order, OrderStatus};

use super::{from_json, to_json};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    cafe_id: String,
    user_id: Option<String>,
    items: String,
    subtotal_kurus: i64,
    discount_kurus: i64,
    total_kurus: i64,
    promo_code: Option<String>,
    status: OrderStatus,
    note: Option<String>,
    table_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Self> {
        Ok(Order {
            id: row.id,
            order_number: row.order_number,
            cafe_id: row.cafe_id,
            user_id: row.user_id,
            items: from_json(&row.items)?,
            subtotal_kurus: row.subtotal_kurus,
            discount_kurus: row.discount_kurus,
            total_kurus: row.total_kurus,
            promo_code: row.promo_code,
            status: row.status,
            note: row.note,
            table_number: row.table_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_ORDER: &str = r#"
    SELECT
        id, order_number, cafe_id, user_id, items, subtotal_kurus,
        discount_kurus, total_kurus, promo_code, status, note, table_number,
        created_at, updated_at
    FROM orders
"#;

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, cafe_id, user_id, items, subtotal_kurus,
                discount_kurus, total_kurus, promo_code, status, note,
                table_number, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.cafe_id)
        .bind(&order.user_id)
        .bind(to_json(&order.items)?)
        .bind(order.subtotal_kurus)
        .bind(order.discount_kurus)
        .bind(order.total_kurus)
        .bind(&order.promo_code)
        .bind(order.status)
        .bind(&order.note)
        .bind(&order.table_number)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        info!(
            id = %order.id,
            order_number = %order.order_number,
            cafe_id = %order.cafe_id,
            total_kurus = order.total_kurus,
            "Order recorded"
        );
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE id = ?1");
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    /// A user's orders, newest first.
    pub async fn list_by_user(&self, user_id: &str, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id, count = rows.len(), "Listed orders by user");
        rows.into_iter().map(Order::try_from).collect()
    }

    /// A cafe's orders, newest first.
    pub async fn list_by_cafe(&self, cafe_id: &str, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!("{SELECT_ORDER} WHERE cafe_id = ?1 ORDER BY created_at DESC LIMIT ?2");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(cafe_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(cafe_id, count = rows.len(), "Listed orders by cafe");
        rows.into_iter().map(Order::try_from).collect()
    }

    /// Sets the status and returns the updated order.
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> DbResult<Order> {
        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }
        info!(id, status = %status, "Order status changed");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }
}
