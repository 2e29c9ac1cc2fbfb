//! # Device Storage
//!
//! Keys of the device key-value store and the few helpers that need more
//! than a plain `set_json`.
//!
//! ```text
//! key                  value
//! ───────────────────  ──────────────────────────────────────────────
//! auth_state           AuthState (user profile + token)
//! selected_cafe        Cafe
//! onboarding_complete  bool
//! order_history        Vec<Order>, newest first, at most 50
//! cart                 Cart
//! ```
//!
//! A value that no longer decodes is discarded on read (no schema
//! versioning).

use cafe_core::{Order, ORDER_HISTORY_LIMIT};
use cafe_db::{DbResult, KvStore};

pub const AUTH_STATE: &str = "auth_state";
pub const SELECTED_CAFE: &str = "selected_cafe";
pub const ONBOARDING_COMPLETE: &str = "onboarding_complete";
pub const ORDER_HISTORY: &str = "order_history";
pub const CART: &str = "cart";

pub async fn order_history(kv: &KvStore) -> DbResult<Vec<Order>> {
    Ok(kv
        .get_json_or_discard::<Vec<Order>>(ORDER_HISTORY)
        .await?
        .unwrap_or_default())
}

/// Puts an order at the front of the history, dropping the oldest past
/// the limit. An order already present is replaced, not duplicated.
pub async fn push_order_history(kv: &KvStore, order: &Order) -> DbResult<Vec<Order>> {
    let mut history = order_history(kv).await?;
    history.retain(|o| o.id != order.id);
    history.insert(0, order.clone());
    history.truncate(ORDER_HISTORY_LIMIT);

    kv.set_json(ORDER_HISTORY, &history).await?;
    Ok(history)
}

pub async fn onboarding_complete(kv: &KvStore) -> DbResult<bool> {
    Ok(kv
        .get_json_or_discard::<bool>(ONBOARDING_COMPLETE)
        .await?
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_core::{Cart, CheckoutDetails, Money};
    use cafe_db::{Database, DbConfig};
    use chrono::Utc;

    fn order() -> Order {
        let products = cafe_core::demo::products(Utc::now());
        let product = products
            .iter()
            .find(|p| p.cafe_id == "moda-kahve")
            .unwrap();
        let mut cart = Cart::new("moda-kahve");
        cart.add_item(product, 1, &Default::default()).unwrap();
        cart.to_order(CheckoutDetails::default(), Money::zero(), Utc::now())
            .unwrap()
    }

    #[tokio::test]
    async fn test_history_newest_first_and_capped() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        let mut last = None;
        for _ in 0..(ORDER_HISTORY_LIMIT + 5) {
            let o = order();
            push_order_history(&kv, &o).await.unwrap();
            last = Some(o);
        }

        let history = order_history(&kv).await.unwrap();
        assert_eq!(history.len(), ORDER_HISTORY_LIMIT);
        assert_eq!(history[0].id, last.unwrap().id);
    }

    #[tokio::test]
    async fn test_same_order_not_duplicated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();
        let o = order();

        push_order_history(&kv, &o).await.unwrap();
        push_order_history(&kv, &o).await.unwrap();
        assert_eq!(order_history(&kv).await.unwrap().len(), 1);
        assert!(!onboarding_complete(&kv).await.unwrap());
    }
}
