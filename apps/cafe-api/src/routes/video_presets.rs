//! Background video presets shared by all cafes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use cafe_core::validation::validate_video_preset;
use cafe_core::{VideoPreset, VideoPresetDraft};

use crate::auth::StaffUser;
use crate::error::AppResult;
use crate::state::AppState;

/// All presets, default first.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<VideoPreset>>> {
    Ok(Json(state.db.video_presets().list().await?))
}

pub async fn create(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Json(draft): Json<VideoPresetDraft>,
) -> AppResult<(StatusCode, Json<VideoPreset>)> {
    validate_video_preset(&draft)?;
    let preset = draft.into_preset(Uuid::new_v4().to_string());
    state.db.video_presets().insert(&preset).await?;

    info!(id = %preset.id, is_default = preset.is_default, by = %claims.sub, "Video preset created");
    Ok((StatusCode::CREATED, Json(preset)))
}

pub async fn update(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<String>,
    Json(draft): Json<VideoPresetDraft>,
) -> AppResult<Json<VideoPreset>> {
    validate_video_preset(&draft)?;
    let preset = draft.into_preset(id);
    state.db.video_presets().update(&preset).await?;

    info!(id = %preset.id, by = %claims.sub, "Video preset updated");
    Ok(Json(preset))
}

pub async fn delete(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.db.video_presets().delete(&id).await?;
    info!(id = %id, by = %claims.sub, "Video preset deleted");
    Ok(StatusCode::NO_CONTENT)
}
