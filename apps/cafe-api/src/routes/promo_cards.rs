//! Promotional cards shown on the menu carousel.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use cafe_core::validation::validate_card_draft;
use cafe_core::{CardDraft, PromotionalCard};

use crate::auth::StaffUser;
use crate::error::{AppError, AppResult};
use crate::routes::cafes::require_cafe;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardQuery {
    pub cafe_id: Option<String>,
    /// Include inactive cards (admin listing).
    #[serde(default)]
    pub all: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CardQuery>,
) -> AppResult<Json<Vec<PromotionalCard>>> {
    let cafe_id = query
        .cafe_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("cafeId is required".to_string()))?;

    require_cafe(&state, &cafe_id).await?;
    let cards = state.db.promo_cards().list_by_cafe(&cafe_id, !query.all).await?;
    Ok(Json(cards))
}

pub async fn create(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Json(draft): Json<CardDraft>,
) -> AppResult<(StatusCode, Json<PromotionalCard>)> {
    validate_card_draft(&draft)?;
    require_cafe(&state, &draft.cafe_id).await?;

    let card = draft.into_card(Uuid::new_v4().to_string());
    state.db.promo_cards().insert(&card).await?;

    info!(id = %card.id, cafe_id = %card.cafe_id, by = %claims.sub, "Card created");
    Ok((StatusCode::CREATED, Json(card)))
}

/// Replaces a card. The card stays with its cafe whatever `cafeId` says.
pub async fn update(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<String>,
    Json(draft): Json<CardDraft>,
) -> AppResult<Json<PromotionalCard>> {
    validate_card_draft(&draft)?;
    let existing = state
        .db
        .promo_cards()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Card {id}")))?;

    let mut card = draft.into_card(id);
    card.cafe_id = existing.cafe_id;
    state.db.promo_cards().update(&card).await?;

    info!(id = %card.id, by = %claims.sub, "Card updated");
    Ok(Json(card))
}

pub async fn delete(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.db.promo_cards().delete(&id).await?;
    info!(id = %id, by = %claims.sub, "Card deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_inactive_cards_hidden_by_default() {
        let app = TestApp::new().await;
        let token = app.staff_token().await;

        let (status, card) = app
            .send(
                Method::POST,
                "/promotional-cards",
                Some(&token),
                Some(json!({
                    "cafeId": "kordon-cay",
                    "title": "Kış menüsü yakında",
                    "subtitle": null,
                    "imageUrl": null,
                    "backgroundColor": "#223344",
                    "ctaLabel": null,
                    "target": { "type": "category", "slug": "tea" },
                    "sortOrder": 9,
                    "isActive": false
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, visible) = app.get("/promotional-cards?cafeId=kordon-cay").await;
        assert!(visible.as_array().unwrap().iter().all(|c| c["id"] != card["id"]));

        let (_, all) = app.get("/promotional-cards?cafeId=kordon-cay&all=true").await;
        assert!(all.as_array().unwrap().iter().any(|c| c["id"] == card["id"]));
    }

    #[tokio::test]
    async fn test_bad_color_rejected() {
        let app = TestApp::new().await;
        let token = app.staff_token().await;

        let (status, _) = app
            .send(
                Method::POST,
                "/promotional-cards",
                Some(&token),
                Some(json!({
                    "cafeId": "kordon-cay",
                    "title": "Renksiz",
                    "subtitle": null,
                    "imageUrl": null,
                    "backgroundColor": "blue",
                    "ctaLabel": null,
                    "sortOrder": 1,
                    "isActive": true
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_unknown_card() {
        let app = TestApp::new().await;
        let token = app.staff_token().await;
        let (status, _) = app
            .send(Method::DELETE, "/promotional-cards/ghost", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
