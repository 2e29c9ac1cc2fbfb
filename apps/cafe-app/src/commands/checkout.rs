//! # Checkout Commands
//!
//! The checkout is a stub: no payment is taken. The order is built from
//! the cart, sent to the API when it is reachable, and always recorded in
//! the device order history.
//!
//! ```text
//! cart ──► Cart::to_order (minimum order, empty cart) ──► POST /orders
//!                                                            │
//!                          accepted ◄──────────────── ok ────┤
//!                          kept local ◄─── transport/API err ┘
//!                                 │
//!                                 ▼
//!                     order_history (newest first, 50 max)
//!                     cart emptied, cafe stays selected
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cafe_core::{CheckoutDetails, CoreError, Order};

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::state::{CartState, CatalogState, DbState, SessionState};
use crate::storage;

/// What the checkout form collects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub note: Option<String>,
    pub table_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order: Order,
    /// True when the API accepted the order.
    pub submitted: bool,
}

/// Places the order for the selected cafe.
pub async fn checkout(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    cart: &CartState,
    request: CheckoutRequest,
) -> ApiResult<CheckoutReceipt> {
    let cafe_id = session.cafe_id().ok_or_else(ApiError::no_cafe)?;
    if cart.cafe_id() != cafe_id {
        return Err(CoreError::EmptyCart.into());
    }

    let config = catalog.inner().app_config(&cafe_id).await?.data;
    if !config.ordering_enabled {
        return Err(ApiError::new(
            ErrorCode::OrderingDisabled,
            "This cafe is not taking orders in the app right now",
        ));
    }

    let details = CheckoutDetails {
        user_id: session.user().map(|u| u.id),
        note: request.note,
        table_number: request.table_number,
    };
    let order = cart.with_cart(|c| c.to_order(details, config.min_order(), Utc::now()))?;

    let token = session.token();
    let (order, submitted) = match catalog.inner().submit_order(token.as_deref(), &order).await {
        Ok(accepted) => (accepted, true),
        Err(e) => {
            warn!(order_id = %order.id, error = %e, "Order not submitted, kept on device");
            (order, false)
        }
    };

    let kv = db.kv();
    storage::push_order_history(&kv, &order).await?;
    cart.with_cart_mut(|c| c.clear());
    cart.persist(&kv).await?;

    info!(
        order_number = %order.order_number,
        total = order.total_kurus,
        submitted,
        "Checkout complete"
    );
    Ok(CheckoutReceipt { order, submitted })
}

/// Orders placed on this device, newest first.
pub async fn order_history(db: &DbState) -> ApiResult<Vec<Order>> {
    Ok(storage::order_history(&db.kv()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cafe::scan_code;
    use crate::commands::cart::{add_to_cart, apply_promo_code};
    use crate::test_context;
    use crate::AppContext;
    use cafe_core::{OptionSelection, OrderStatus};

    async fn add(ctx: &AppContext, product_id: &str, quantity: i64) {
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
        .unwrap();
    }

    #[tokio::test]
    async fn test_offline_checkout_recorded_locally() {
        let ctx = test_context().await;
        scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, "MODA01")
            .await
            .unwrap();
        add(&ctx, "moda-latte", 2).await;
        apply_promo_code(&ctx.db, &ctx.catalog, &ctx.cart, "HOSGELDIN")
            .await
            .unwrap();

        let receipt = checkout(
            &ctx.db,
            &ctx.catalog,
            &ctx.session,
            &ctx.cart,
            CheckoutRequest {
                note: Some("Az şekerli".to_string()),
                table_number: Some("7".to_string()),
            },
        )
        .await
        .unwrap();

        assert!(!receipt.submitted);
        assert_eq!(receipt.order.status, OrderStatus::Pending);
        assert_eq!(receipt.order.total_kurus, 15_300);
        assert_eq!(receipt.order.promo_code.as_deref(), Some("HOSGELDIN"));
        assert!(receipt.order.order_number.starts_with("C-"));

        let history = order_history(&ctx.db).await.unwrap();
        assert_eq!(history[0].id, receipt.order.id);
        assert_eq!(ctx.cart.totals().item_count, 0);
        assert_eq!(ctx.session.cafe_id().as_deref(), Some("moda-kahve"));
    }

    #[tokio::test]
    async fn test_minimum_order_and_empty_cart() {
        let ctx = test_context().await;
        scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, "CARSI02")
            .await
            .unwrap();

        let err = checkout(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, CheckoutRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        // Çarşı Lab's cheapest item is under a raised 100 TL minimum
        let demo = ctx.catalog.inner().demo();
        let mut config = demo.app_config("carsi-lab").await;
        config.min_order_kurus = 10_000;
        demo.save_app_config(config.clone()).await;
        add(&ctx, "carsi-granola", 1).await;

        let err = checkout(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, CheckoutRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        config.ordering_enabled = false;
        demo.save_app_config(config).await;
        let err = checkout(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, CheckoutRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderingDisabled);

        assert!(order_history(&ctx.db).await.unwrap().is_empty());
        assert_eq!(ctx.cart.totals().item_count, 1);
    }
}
