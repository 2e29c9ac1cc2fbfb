//! # REST Payloads
//!
//! Request and response bodies of the REST API that are not plain domain
//! records. The server and the client both use these, so a field rename
//! breaks both sides at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::promo::PromoRejection;
use crate::types::{OrderStatus, PromoCode, UserProfile};

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Machine-readable code (`NOT_FOUND`, `VALIDATION_ERROR`, ...).
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
}

/// Successful login or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    /// Bearer token for later requests.
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePromoRequest {
    pub code: String,
    pub subtotal_kurus: i64,
}

/// Outcome of checking a promo code against a subtotal.
///
/// Unknown codes are a 404; known but unusable codes come back here with
/// `valid = false` and the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromoValidation {
    pub code: String,
    pub valid: bool,
    pub discount_kurus: i64,
    pub promo: Option<PromoCode>,
    pub rejection: Option<PromoRejection>,
}

impl PromoValidation {
    pub fn accepted(promo: PromoCode, discount_kurus: i64) -> Self {
        PromoValidation {
            code: promo.code.clone(),
            valid: true,
            discount_kurus,
            promo: Some(promo),
            rejection: None,
        }
    }

    pub fn rejected(code: &str, rejection: PromoRejection) -> Self {
        PromoValidation {
            code: code.to_string(),
            valid: false,
            discount_kurus: 0,
            promo: None,
            rejection: Some(rejection),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}
