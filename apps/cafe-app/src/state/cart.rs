//! # Cart State
//!
//! Holds the current shopping cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>`: several commands touch it and
//! only one may change it at a time. The lock is never held across an
//! `.await`; commands mutate, take a snapshot, then persist the snapshot.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User Action            Command                  Cart State Change      │
//! │  ───────────            ───────                  ─────────────────      │
//! │  Tap product ─────────► add_to_cart() ─────────► line added / merged   │
//! │  Change quantity ─────► update_cart_item() ────► qty = n (0 removes)   │
//! │  Tap remove ──────────► remove_from_cart() ────► line removed          │
//! │  Enter promo ─────────► apply_promo_code() ────► promo attached        │
//! │  Scan another cafe ───► scan_code() ───────────► reset(new cafe)       │
//! │                                                                         │
//! │  After every change the cart is written to the `cart` key.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use cafe_core::{Cart, CartTotals};
use cafe_db::{DbResult, KvStore};

use crate::storage;

/// Cart state managed by the app.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Empty cart not tied to any cafe yet.
    pub fn new() -> Self {
        CartState::from_cart(Cart::new(""))
    }

    pub fn from_cart(cart: Cart) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(cart)),
        }
    }

    /// Loads the persisted cart if it belongs to `cafe_id`.
    ///
    /// A cart saved for another cafe (or with no cafe selected) is dropped.
    pub async fn restore(kv: &KvStore, cafe_id: Option<&str>) -> DbResult<Self> {
        let saved = kv.get_json_or_discard::<Cart>(storage::CART).await?;
        let cart = match (saved, cafe_id) {
            (Some(cart), Some(id)) if cart.cafe_id == id => {
                debug!(cafe_id = id, lines = cart.item_count(), "Cart restored");
                cart
            }
            (_, Some(id)) => Cart::new(id),
            (_, None) => Cart::new(""),
        };
        Ok(CartState::from_cart(cart))
    }

    // Poisoning is ignored: any cart value left behind is still displayable.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product, 1, &selection))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut self.lock())
    }

    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart))
    }

    pub fn cafe_id(&self) -> String {
        self.with_cart(|cart| cart.cafe_id.clone())
    }

    /// Replaces the cart with an empty one for `cafe_id`.
    pub fn reset(&self, cafe_id: &str) {
        *self.lock() = Cart::new(cafe_id);
    }

    /// Writes the current cart to the device store.
    pub async fn persist(&self, kv: &KvStore) -> DbResult<()> {
        let cart = self.snapshot();
        kv.set_json(storage::CART, &cart).await
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_db::{Database, DbConfig};
    use chrono::Utc;

    #[tokio::test]
    async fn test_persist_and_restore() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();
        let products = cafe_core::demo::products(Utc::now());
        let latte = products.iter().find(|p| p.id == "moda-latte").unwrap();

        let state = CartState::from_cart(Cart::new("moda-kahve"));
        state
            .with_cart_mut(|cart| cart.add_item(latte, 2, &Default::default()))
            .unwrap();
        state.persist(&kv).await.unwrap();

        let restored = CartState::restore(&kv, Some("moda-kahve")).await.unwrap();
        assert_eq!(restored.totals().subtotal_kurus, 17_000);

        let other = CartState::restore(&kv, Some("carsi-lab")).await.unwrap();
        assert!(other.with_cart(Cart::is_empty));
        assert_eq!(other.cafe_id(), "carsi-lab");
    }

    #[test]
    fn test_reset_switches_cafe() {
        let state = CartState::new();
        state.reset("kordon-cay");
        assert_eq!(state.cafe_id(), "kordon-cay");
        assert!(state.with_cart(Cart::is_empty));
    }
}
