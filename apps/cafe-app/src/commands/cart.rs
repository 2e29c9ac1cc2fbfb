//! # Cart Commands
//!
//! Cart manipulation and promo codes. Every change is written to the
//! device store before the command returns.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│  Promo   │────►│ Checkout │       │
//! │  │  Cart    │     │          │     │ applied  │     │ (order)  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                │             │
//! │                   add_to_cart      apply_promo_code   checkout.rs      │
//! │                   update_cart_item remove_promo_code                    │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart / scan of another cafe ──► Empty           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use cafe_core::{Cart, CartItem, CartTotals, CoreError, OptionSelection, PromoRejection};

use crate::error::{ApiError, ApiResult};
use crate::state::{CartState, CatalogState, DbState, SessionState};

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cafe_id: String,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            cafe_id: cart.cafe_id.clone(),
            items: cart.items.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

async fn saved(db: &DbState, cart: &CartState) -> ApiResult<CartResponse> {
    cart.persist(&db.kv()).await?;
    Ok(cart.with_cart(|c| CartResponse::from(c)))
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Same product with the same options: quantity increases
/// - Otherwise: new line with the price frozen (base + option deltas)
/// - The product must belong to the selected cafe and be available
pub async fn add_to_cart(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    cart: &CartState,
    product_id: &str,
    quantity: i64,
    selection: &OptionSelection,
) -> ApiResult<CartResponse> {
    let cafe_id = session.cafe_id().ok_or_else(ApiError::no_cafe)?;
    let product = catalog.inner().product(product_id).await?.data;

    if cart.cafe_id() != cafe_id {
        cart.reset(&cafe_id);
    }
    let line_id = cart.with_cart_mut(|c| c.add_item(&product, quantity, selection))?;

    debug!(product_id, line_id = %line_id, quantity, "Added to cart");
    saved(db, cart).await
}

/// Sets a line's quantity; 0 removes it.
pub async fn update_cart_item(
    db: &DbState,
    cart: &CartState,
    line_id: &str,
    quantity: i64,
) -> ApiResult<CartResponse> {
    cart.with_cart_mut(|c| c.update_quantity(line_id, quantity))?;
    saved(db, cart).await
}

pub async fn remove_from_cart(
    db: &DbState,
    cart: &CartState,
    line_id: &str,
) -> ApiResult<CartResponse> {
    cart.with_cart_mut(|c| c.remove_item(line_id))?;
    saved(db, cart).await
}

pub async fn clear_cart(db: &DbState, cart: &CartState) -> ApiResult<CartResponse> {
    cart.with_cart_mut(Cart::clear);
    saved(db, cart).await
}

/// Checks a promo code against the current subtotal and attaches it.
///
/// The discount is recomputed on every read, so a code whose minimum stops
/// being met later simply yields no discount.
pub async fn apply_promo_code(
    db: &DbState,
    catalog: &CatalogState,
    cart: &CartState,
    code: &str,
) -> ApiResult<CartResponse> {
    if cart.with_cart(Cart::is_empty) {
        return Err(CoreError::EmptyCart.into());
    }

    let subtotal = cart.with_cart(Cart::subtotal);
    let checked = catalog.inner().validate_promo(code, subtotal).await?.data;
    if !checked.valid {
        return Err(CoreError::PromoRejected {
            code: checked.code,
            reason: checked.rejection.unwrap_or(PromoRejection::Inactive),
        }
        .into());
    }
    let promo = checked
        .promo
        .ok_or_else(|| ApiError::internal("Promo validation returned no promo"))?;

    let discount = cart.with_cart_mut(|c| c.apply_promo(promo, Utc::now()))?;
    info!(code = %checked.code, discount = %discount, "Promo code applied");
    saved(db, cart).await
}

pub async fn remove_promo_code(db: &DbState, cart: &CartState) -> ApiResult<CartResponse> {
    cart.with_cart_mut(Cart::clear_promo);
    saved(db, cart).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cafe::scan_code;
    use crate::error::ErrorCode;
    use crate::test_context;
    use crate::AppContext;

    async fn at_moda() -> AppContext {
        let ctx = test_context().await;
        scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, "MODA01")
            .await
            .unwrap();
        ctx
    }

    async fn add(ctx: &AppContext, product_id: &str, quantity: i64) -> ApiResult<CartResponse> {
        add_to_cart(
            &ctx.db,
            &ctx.catalog,
            &ctx.session,
            &ctx.cart,
            product_id,
            quantity,
            &OptionSelection::default(),
        )
        .await
    }

    #[tokio::test]
    async fn test_add_merge_update_remove() {
        let ctx = at_moda().await;

        add(&ctx, "moda-latte", 1).await.unwrap();
        let cart = add(&ctx, "moda-latte", 2).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.totals.subtotal_kurus, 25_500);

        let line = cart.items[0].line_id.clone();
        let cart = update_cart_item(&ctx.db, &ctx.cart, &line, 1).await.unwrap();
        assert_eq!(cart.totals.total_kurus, 8_500);

        let cart = remove_from_cart(&ctx.db, &ctx.cart, &line).await.unwrap();
        assert!(cart.items.is_empty());

        let err = remove_from_cart(&ctx.db, &ctx.cart, &line).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_product_of_other_cafe_rejected() {
        let ctx = at_moda().await;
        let carsi = ctx
            .catalog
            .inner()
            .products("carsi-lab", None)
            .await
            .unwrap()
            .data;

        let err = add(&ctx, &carsi[0].id, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_promo_apply_and_remove() {
        let ctx = at_moda().await;

        let err = apply_promo_code(&ctx.db, &ctx.catalog, &ctx.cart, "HOSGELDIN")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        // KAHVE20 needs a 100 TL subtotal
        add(&ctx, "moda-latte", 1).await.unwrap();
        let err = apply_promo_code(&ctx.db, &ctx.catalog, &ctx.cart, "KAHVE20")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PromoRejected);

        add(&ctx, "moda-latte", 1).await.unwrap();
        let cart = apply_promo_code(&ctx.db, &ctx.catalog, &ctx.cart, "hosgeldin")
            .await
            .unwrap();
        assert_eq!(cart.totals.promo_code.as_deref(), Some("HOSGELDIN"));
        assert_eq!(cart.totals.discount_kurus, 1_700);
        assert_eq!(cart.totals.total_kurus, 15_300);

        let err = apply_promo_code(&ctx.db, &ctx.catalog, &ctx.cart, "YOKBOYLE")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let cart = remove_promo_code(&ctx.db, &ctx.cart).await.unwrap();
        assert!(cart.totals.promo_code.is_none());
        assert_eq!(cart.totals.discount_kurus, 0);
    }

    #[tokio::test]
    async fn test_clear_persists() {
        let ctx = at_moda().await;
        add(&ctx, "moda-latte", 1).await.unwrap();
        clear_cart(&ctx.db, &ctx.cart).await.unwrap();

        let saved: Cart = ctx.db.kv().get_json("cart").await.unwrap().unwrap();
        assert!(saved.is_empty());
        assert_eq!(get_cart(&ctx.cart).totals.item_count, 0);
    }
}
