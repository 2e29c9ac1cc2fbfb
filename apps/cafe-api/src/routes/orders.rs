//! Order submission and tracking.
//!
//! ```text
//! app checkout ──POST /orders──► checks ──► catalog prices ──► orders table
//!                                  │              │                 │
//!                                  │              │                 └──► promo usage +1
//!                                  ▼              ▼
//!     empty cart / bad totals → 400      unknown product → 404,
//!     unknown cafe → 404                 other cafe / sold out / stale price → 400
//!     ordering switched off → 400, duplicate id → 409
//! ```
//! Line prices are recomputed from the stored product and its option
//! deltas; the client's numbers must match them exactly.
//!
//! Status changes are free-form: any status may follow any other.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use cafe_core::cart::resolve_selection;
use cafe_core::validation::{validate_price, validate_quantity};
use cafe_core::wire::UpdateOrderStatusRequest;
use cafe_core::{
    CoreError, Money, OptionGroup, OptionSelection, Order, OrderStatus, SelectedOption,
    ORDER_HISTORY_LIMIT,
};

use crate::auth::{AuthUser, MaybeAuthUser, StaffUser};
use crate::error::{AppError, AppResult};
use crate::routes::cafes::require_cafe;
use crate::state::AppState;

const MAX_LIST_LIMIT: u32 = 200;

/// Recomputes the money fields of a submitted order.
fn check_totals(order: &Order) -> AppResult<()> {
    if order.items.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let mut subtotal = Money::zero();
    for item in &order.items {
        validate_quantity(item.quantity)?;
        validate_price(item.unit_price_kurus)?;
        let line = Money::from_kurus(item.unit_price_kurus).multiply_quantity(item.quantity);
        if line.kurus() != item.line_total_kurus {
            return Err(AppError::BadRequest(format!(
                "Line total of {} does not match its price",
                item.name
            )));
        }
        subtotal += line;
    }

    if subtotal.kurus() != order.subtotal_kurus {
        return Err(AppError::BadRequest("Subtotal does not match the items".to_string()));
    }
    if order.discount_kurus < 0 || order.discount_kurus > order.subtotal_kurus {
        return Err(AppError::BadRequest("Discount out of range".to_string()));
    }
    if order.total_kurus != order.subtotal_kurus - order.discount_kurus {
        return Err(AppError::BadRequest("Total does not match".to_string()));
    }
    Ok(())
}

/// Turns the options stored on a line back into the ids picked on the sheet.
fn selection_of(options: &[SelectedOption]) -> AppResult<OptionSelection> {
    let mut selection = OptionSelection::default();
    for option in options {
        let slot = match option.group {
            OptionGroup::Size => &mut selection.size,
            OptionGroup::Milk => &mut selection.milk,
            OptionGroup::Extra => {
                selection.extras.push(option.id.clone());
                continue;
            }
        };
        if slot.replace(option.id.clone()).is_some() {
            return Err(AppError::BadRequest(
                "Only one size and one milk per line".to_string(),
            ));
        }
    }
    Ok(selection)
}

/// Checks every line against the catalog and freezes the server's name and
/// options onto it.
async fn price_items(state: &AppState, order: &mut Order) -> AppResult<()> {
    let products = state.db.products();
    for item in &mut order.items {
        let product = products
            .get_by_id(&item.product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", item.product_id)))?;
        if product.cafe_id != order.cafe_id {
            return Err(AppError::BadRequest(format!(
                "{} is not sold at this cafe",
                product.name
            )));
        }
        if !product.is_available {
            return Err(AppError::BadRequest(format!("{} is sold out", product.name)));
        }

        let options = resolve_selection(&product, &selection_of(&item.options)?)?;
        let mut unit = Money::from_kurus(product.price_kurus);
        for option in &options {
            unit += Money::from_kurus(option.price_delta_kurus);
        }
        if unit.kurus() != item.unit_price_kurus {
            return Err(AppError::BadRequest(format!(
                "Price of {} is {}, not {}",
                product.name,
                unit.format_try(),
                Money::from_kurus(item.unit_price_kurus).format_try()
            )));
        }

        item.name = product.name;
        item.options = options;
    }
    Ok(())
}

/// `POST /orders`. Guests send no token; with a token the order is filed
/// under the token's user.
pub async fn submit(
    State(state): State<AppState>,
    MaybeAuthUser(claims): MaybeAuthUser,
    Json(mut order): Json<Order>,
) -> AppResult<(StatusCode, Json<Order>)> {
    check_totals(&order)?;
    require_cafe(&state, &order.cafe_id).await?;
    price_items(&state, &mut order).await?;

    if let Some(config) = state.db.app_configs().get(&order.cafe_id).await? {
        if !config.ordering_enabled {
            return Err(AppError::BadRequest(
                "This cafe is not taking orders right now".to_string(),
            ));
        }
    }

    let now = Utc::now();
    let promo = match &order.promo_code {
        Some(code) => {
            let promo = state
                .db
                .promo_codes()
                .get_by_code(code)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Promo code {code}")))?;
            let discount = promo
                .check(now, Money::from_kurus(order.subtotal_kurus))
                .map_err(|reason| CoreError::PromoRejected {
                    code: promo.code.clone(),
                    reason,
                })?;
            if discount.kurus() != order.discount_kurus {
                return Err(AppError::BadRequest(
                    "Discount does not match the promo code".to_string(),
                ));
            }
            Some(promo)
        }
        None if order.discount_kurus != 0 => {
            return Err(AppError::BadRequest("Discount without a promo code".to_string()));
        }
        None => None,
    };

    order.user_id = claims.map(|c| c.sub);
    order.status = OrderStatus::Pending;
    order.updated_at = now;
    state.db.orders().insert(&order).await?;

    if let Some(promo) = promo {
        // Plain increment: two orders racing past the limit both go through
        if let Err(e) = state.db.promo_codes().increment_usage(&promo.id).await {
            warn!(
                code = %promo.code,
                order_id = %order.id,
                error = %e,
                "Order stored but promo use not counted, usage count now lags by one"
            );
        }
    }

    info!(
        id = %order.id,
        number = %order.order_number,
        cafe_id = %order.cafe_id,
        total = order.total_kurus,
        "Order received"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Order>> {
    state
        .db
        .orders()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub user_id: Option<String>,
    pub cafe_id: Option<String>,
    pub limit: Option<u32>,
}

/// `GET /orders?userId=` (own orders, or staff) or `?cafeId=` (staff).
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let limit = query
        .limit
        .unwrap_or(ORDER_HISTORY_LIMIT as u32)
        .clamp(1, MAX_LIST_LIMIT);

    match (query.user_id, query.cafe_id) {
        (Some(user_id), _) => {
            if user_id != claims.sub && !claims.role.can_manage() {
                return Err(AppError::Forbidden("Not your orders".to_string()));
            }
            Ok(Json(state.db.orders().list_by_user(&user_id, limit).await?))
        }
        (None, Some(cafe_id)) => {
            if !claims.role.can_manage() {
                return Err(AppError::Forbidden("Staff account required".to_string()));
            }
            Ok(Json(state.db.orders().list_by_cafe(&cafe_id, limit).await?))
        }
        (None, None) => Err(AppError::BadRequest(
            "userId or cafeId is required".to_string(),
        )),
    }
}

pub async fn update_status(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .db
        .orders()
        .update_status(&id, req.status, Utc::now())
        .await?;
    info!(id = %id, status = %req.status, by = %claims.sub, "Order status updated");
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::Utc;
    use serde_json::{json, Value};

    use cafe_core::cart::OptionSelection;
    use cafe_core::{Cart, CheckoutDetails, Money, UserRole};

    use crate::routes::test_support::TestApp;

    async fn order_json(app: &TestApp, promo: Option<&str>) -> Value {
        let latte = app
            .state
            .db
            .products()
            .get_by_id("moda-latte")
            .await
            .unwrap()
            .unwrap();
        let mut cart = Cart::new("moda-kahve");
        cart.add_item(&latte, 2, &OptionSelection::default()).unwrap();
        if let Some(code) = promo {
            let promo = app.state.db.promo_codes().get_by_code(code).await.unwrap().unwrap();
            cart.apply_promo(promo, Utc::now()).unwrap();
        }
        let order = cart
            .to_order(CheckoutDetails::default(), Money::zero(), Utc::now())
            .unwrap();
        serde_json::to_value(order).unwrap()
    }

    #[tokio::test]
    async fn test_guest_order_roundtrip() {
        let app = TestApp::new().await;
        let order = order_json(&app, None).await;

        let (status, created) = app.send(Method::POST, "/orders", None, Some(order)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "pending");
        assert_eq!(created["totalKurus"], 17_000);
        assert!(created["userId"].is_null());

        let id = created["id"].as_str().unwrap();
        let (status, fetched) = app.get(&format!("/orders/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["orderNumber"], created["orderNumber"]);
    }

    #[tokio::test]
    async fn test_tampered_totals_rejected() {
        let app = TestApp::new().await;
        let mut order = order_json(&app, None).await;
        order["totalKurus"] = json!(100);

        let (status, _) = app.send(Method::POST, "/orders", None, Some(order)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut empty = order_json(&app, None).await;
        empty["items"] = json!([]);
        let (status, _) = app.send(Method::POST, "/orders", None, Some(empty)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_line_prices_come_from_catalog() {
        let app = TestApp::new().await;

        let mut cheap = order_json(&app, None).await;
        cheap["items"][0]["unitPriceKurus"] = json!(1);
        cheap["items"][0]["lineTotalKurus"] = json!(2);
        cheap["subtotalKurus"] = json!(2);
        cheap["totalKurus"] = json!(2);
        let (status, _) = app.send(Method::POST, "/orders", None, Some(cheap)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut unknown = order_json(&app, None).await;
        unknown["items"][0]["productId"] = json!("does-not-exist");
        let (status, _) = app.send(Method::POST, "/orders", None, Some(unknown)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let mut elsewhere = order_json(&app, None).await;
        elsewhere["items"][0]["productId"] = json!("carsi-cortado");
        let (status, _) = app.send(Method::POST, "/orders", None, Some(elsewhere)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut renamed = order_json(&app, None).await;
        renamed["items"][0]["name"] = json!("Bedava Latte");
        let (status, created) = app.send(Method::POST, "/orders", None, Some(renamed)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_ne!(created["items"][0]["name"], "Bedava Latte");

        let staff = app.staff_token().await;
        let (_, listed) = app
            .send(Method::GET, "/orders?cafeId=moda-kahve", Some(&staff), None)
            .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_huge_unit_price_rejected() {
        let app = TestApp::new().await;
        let mut order = order_json(&app, None).await;
        order["items"][0]["unitPriceKurus"] = json!(i64::MAX / 2);
        order["items"][0]["quantity"] = json!(3);
        order["items"][0]["lineTotalKurus"] = json!(0);

        let (status, body) = app.send(Method::POST, "/orders", None, Some(order)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_promo_use_counted() {
        let app = TestApp::new().await;
        let order = order_json(&app, Some("HOSGELDIN")).await;
        assert_eq!(order["discountKurus"], 1_700);

        let (status, _) = app.send(Method::POST, "/orders", None, Some(order)).await;
        assert_eq!(status, StatusCode::CREATED);

        let promo = app
            .state
            .db
            .promo_codes()
            .get_by_code("HOSGELDIN")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(promo.usage_count, 1);
    }

    #[tokio::test]
    async fn test_history_and_status() {
        let app = TestApp::new().await;
        let customer = app.token_for("customer-1", UserRole::Customer).await;
        let staff = app.staff_token().await;

        let order = order_json(&app, None).await;
        let (_, created) = app
            .send(Method::POST, "/orders", Some(&customer), Some(order))
            .await;
        assert_eq!(created["userId"], "customer-1");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, mine) = app
            .send(Method::GET, "/orders?userId=customer-1", Some(&customer), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine.as_array().unwrap().len(), 1);

        let (status, _) = app
            .send(Method::GET, "/orders?userId=someone-else", Some(&customer), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .send(
                Method::PUT,
                &format!("/orders/{id}/status"),
                Some(&customer),
                Some(json!({ "status": "ready" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, updated) = app
            .send(
                Method::PUT,
                &format!("/orders/{id}/status"),
                Some(&staff),
                Some(json!({ "status": "ready" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "ready");

        let (_, by_cafe) = app
            .send(Method::GET, "/orders?cafeId=moda-kahve", Some(&staff), None)
            .await;
        assert_eq!(by_cafe.as_array().unwrap().len(), 1);
    }
}
