//! Cafe listing.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use cafe_core::Cafe;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeQuery {
    /// Table QR code; narrows the list to the matching cafe.
    pub code: Option<String>,
}

/// Active cafes, or the one matching `?code=`.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CafeQuery>,
) -> AppResult<Json<Vec<Cafe>>> {
    if let Some(code) = query.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        let found = state.db.cafes().get_by_qr_code(code).await?;
        return Ok(Json(found.filter(|c| c.is_active).into_iter().collect()));
    }
    Ok(Json(state.db.cafes().list(true).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Cafe>> {
    state
        .db
        .cafes()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Cafe {id}")))
}

/// 404 unless the cafe exists. Shared by the per-cafe routes.
pub(crate) async fn require_cafe(state: &AppState, cafe_id: &str) -> AppResult<Cafe> {
    state
        .db
        .cafes()
        .get_by_id(cafe_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cafe {cafe_id}")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_list_and_get() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/cafes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (status, body) = app.get("/cafes/moda-kahve").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["qrCode"], "MODA01");

        let (status, body) = app.get("/cafes/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_lookup_by_code() {
        let app = TestApp::new().await;
        let (_, body) = app.get("/cafes?code=carsi02").await;
        let cafes = body.as_array().unwrap();
        assert_eq!(cafes.len(), 1);
        assert_eq!(cafes[0]["id"], "carsi-lab");

        let (_, body) = app.get("/cafes?code=NOPE99").await;
        assert!(body.as_array().unwrap().is_empty());
    }
}
