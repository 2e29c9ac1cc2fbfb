//! Account registration and login (phone + password).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use cafe_core::validation::{normalize_phone, validate_password, validate_person_name};
use cafe_core::wire::{AuthResponse, LoginRequest, RegisterRequest};
use cafe_core::{User, UserRole};
use cafe_db::{hash_password, verify_password, DbError};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn respond(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        user: user.profile(),
        token: state.jwt.issue(user)?,
        expires_in: state.jwt.lifetime_secs(),
    })
}

/// Creates a customer account and signs it in.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_person_name(&req.name)?;
    let phone = normalize_phone(&req.phone)?;
    validate_password(&req.password)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        phone,
        name: req.name.trim().to_string(),
        password_hash: hash_password(&req.password)?,
        role: UserRole::Customer,
        created_at: Utc::now(),
    };

    state.db.users().insert(&user).await.map_err(|e| match e {
        DbError::UniqueViolation { .. } => {
            AppError::Conflict("This phone number is already registered".to_string())
        }
        other => other.into(),
    })?;

    info!(user_id = %user.id, "Account registered");
    Ok((StatusCode::CREATED, Json(respond(&state, &user)?)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Unauthorized("Invalid phone or password".to_string());

    let phone = normalize_phone(&req.phone).map_err(|_| invalid())?;
    let user = state.db.users().get_by_phone(&phone).await?.ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash) {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    info!(user_id = %user.id, role = %user.role, "Login succeeded");
    Ok(Json(respond(&state, &user)?))
}
