//! Per-cafe app configuration (colors, welcome text, ordering switch).

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use cafe_core::validation::validate_app_config;
use cafe_core::AppConfig;

use crate::auth::StaffUser;
use crate::error::{AppError, AppResult};
use crate::routes::cafes::require_cafe;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigQuery {
    pub cafe_id: Option<String>,
}

/// Stored config, or the default one for a cafe that never saved any.
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<ConfigQuery>,
) -> AppResult<Json<AppConfig>> {
    let cafe_id = query
        .cafe_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("cafeId is required".to_string()))?;

    require_cafe(&state, &cafe_id).await?;
    let config = state
        .db
        .app_configs()
        .get(&cafe_id)
        .await?
        .unwrap_or_else(|| AppConfig::default_for(&cafe_id, Utc::now()));
    Ok(Json(config))
}

pub async fn save(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Json(mut config): Json<AppConfig>,
) -> AppResult<Json<AppConfig>> {
    validate_app_config(&config)?;
    require_cafe(&state, &config.cafe_id).await?;

    config.updated_at = Utc::now();
    state.db.app_configs().upsert(&config).await?;

    info!(cafe_id = %config.cafe_id, by = %claims.sub, "App config saved");
    Ok(Json(config))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_get_and_save() {
        let app = TestApp::new().await;
        let token = app.staff_token().await;

        let (status, mut config) = app.get("/app-config?cafeId=carsi-lab").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(config["minOrderKurus"], 5_000);

        config["welcomeMessage"] = json!("Yeni sezon başladı");
        let (status, saved) = app
            .send(Method::PUT, "/app-config", Some(&token), Some(config))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["welcomeMessage"], "Yeni sezon başladı");

        let (_, reread) = app.get("/app-config?cafeId=carsi-lab").await;
        assert_eq!(reread["welcomeMessage"], "Yeni sezon başladı");
    }

    #[tokio::test]
    async fn test_unknown_cafe() {
        let app = TestApp::new().await;
        let (status, _) = app.get("/app-config?cafeId=ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
