//! Promo code checks at the cart screen.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use tracing::debug;

use cafe_core::validation::validate_promo_code_format;
use cafe_core::wire::{PromoValidation, ValidatePromoRequest};
use cafe_core::Money;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// 404 for an unknown code; 200 with `valid: false` for one that exists
/// but cannot be used right now.
///
/// Checking does not count a use. That happens when an order carrying the
/// code is submitted.
pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidatePromoRequest>,
) -> AppResult<Json<PromoValidation>> {
    let code = validate_promo_code_format(&req.code)?;
    if req.subtotal_kurus < 0 {
        return Err(AppError::BadRequest("subtotalKurus cannot be negative".to_string()));
    }

    let promo = state
        .db
        .promo_codes()
        .get_by_code(&code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Promo code {code}")))?;

    let result = match promo.check(Utc::now(), Money::from_kurus(req.subtotal_kurus)) {
        Ok(discount) => PromoValidation::accepted(promo, discount.kurus()),
        Err(reason) => {
            debug!(code = %code, reason = %reason, "Promo code rejected");
            PromoValidation::rejected(&code, reason)
        }
    };
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    async fn check(app: &TestApp, code: &str, subtotal: i64) -> (StatusCode, serde_json::Value) {
        app.send(
            Method::POST,
            "/promo-codes/validate",
            None,
            Some(json!({ "code": code, "subtotalKurus": subtotal })),
        )
        .await
    }

    #[tokio::test]
    async fn test_accepted_code() {
        let app = TestApp::new().await;
        let (status, body) = check(&app, "kahve20", 15_000).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["discountKurus"], 2_000);
    }

    #[tokio::test]
    async fn test_rejected_codes() {
        let app = TestApp::new().await;

        let (status, body) = check(&app, "KAHVE20", 5_000).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);

        let (_, body) = check(&app, "YAZ2023", 50_000).await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["discountKurus"], 0);

        let (status, _) = check(&app, "BOYLEBIRKODYOK", 5_000).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
