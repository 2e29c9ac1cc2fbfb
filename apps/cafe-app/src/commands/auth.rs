//! # Auth Commands
//!
//! Phone-and-password accounts. The API is asked first; when it cannot be
//! reached the device database stands in, so a customer can still sign in
//! at a cafe with no connection.
//!
//! ## Sign-in Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login(phone, password)                                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  POST /auth/login ──ok──► AuthState { token, offline: false }          │
//! │        │                  user cached in the device database           │
//! │        │ 401 ──────────► UNAUTHORIZED                                   │
//! │        │ unreachable                                                    │
//! │        ▼                                                                │
//! │  users table ──argon2 ok──► AuthState { token: None, offline: true }   │
//! │              ──mismatch──► UNAUTHORIZED                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use cafe_core::validation::{normalize_phone, validate_password, validate_person_name};
use cafe_core::wire::AuthResponse;
use cafe_core::{User, UserProfile, UserRole};
use cafe_db::{hash_password, verify_password};

use crate::error::{ApiError, ApiResult};
use crate::state::{AuthState, CatalogState, DbState, SessionState};

const INVALID_CREDENTIALS: &str = "Invalid phone or password";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
}

fn online_auth(response: AuthResponse) -> AuthState {
    AuthState {
        user: response.user,
        token: Some(response.token),
        offline: false,
        signed_in_at: Utc::now(),
    }
}

fn offline_auth(user: UserProfile) -> AuthState {
    AuthState {
        user,
        token: None,
        offline: true,
        signed_in_at: Utc::now(),
    }
}

/// Creates an account and signs it in.
///
/// ## Errors
/// * `VALIDATION_ERROR` - bad name, phone or password
/// * `CONFLICT` - phone already registered
pub async fn register(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    request: RegisterRequest,
) -> ApiResult<AuthState> {
    let name = request.name.trim().to_string();
    validate_person_name(&name)?;
    let phone = normalize_phone(&request.phone)?;
    validate_password(&request.password)?;

    let auth = match catalog.inner().register(&name, &phone, &request.password).await {
        Ok(response) => online_auth(response),
        Err(e) if e.is_transport() => {
            warn!(error = %e, "API unreachable, registering on this device");
            let user = User {
                id: Uuid::new_v4().to_string(),
                phone,
                name,
                password_hash: hash_password(&request.password)?,
                role: UserRole::Customer,
                created_at: Utc::now(),
            };
            db.inner().users().insert(&user).await?;
            offline_auth(user.profile())
        }
        Err(e) => return Err(e.into()),
    };

    session.sign_in(&db.kv(), auth.clone()).await?;
    info!(user_id = %auth.user.id, offline = auth.offline, "Registered");
    Ok(auth)
}

/// Signs in with phone and password.
pub async fn login(
    db: &DbState,
    catalog: &CatalogState,
    session: &SessionState,
    phone: &str,
    password: &str,
) -> ApiResult<AuthState> {
    let phone = normalize_phone(phone)?;

    let auth = match catalog.inner().login(&phone, password).await {
        Ok(response) => {
            cache_user(db, &response.user, password).await;
            online_auth(response)
        }
        Err(e) if e.is_transport() => {
            warn!(error = %e, "API unreachable, checking device accounts");
            let user = db
                .inner()
                .users()
                .get_by_phone(&phone)
                .await?
                .filter(|u| verify_password(password, &u.password_hash))
                .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;
            offline_auth(user.profile())
        }
        Err(e) => return Err(e.into()),
    };

    session.sign_in(&db.kv(), auth.clone()).await?;
    info!(user_id = %auth.user.id, offline = auth.offline, "Signed in");
    Ok(auth)
}

/// Keeps a copy of an API account so the same credentials work offline.
///
/// Failures are logged and ignored; the API sign-in already succeeded.
async fn cache_user(db: &DbState, profile: &UserProfile, password: &str) {
    let users = db.inner().users();
    match users.get_by_phone(&profile.phone).await {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "Could not look up cached account");
            return;
        }
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!(error = %e, "Could not hash password for cached account");
            return;
        }
    };
    let user = User {
        id: profile.id.clone(),
        phone: profile.phone.clone(),
        name: profile.name.clone(),
        password_hash,
        role: profile.role,
        created_at: profile.created_at,
    };
    if let Err(e) = users.insert(&user).await {
        warn!(error = %e, "Could not cache account on device");
    }
}

pub async fn logout(db: &DbState, session: &SessionState) -> ApiResult<()> {
    session.sign_out(&db.kv()).await?;
    info!("Signed out");
    Ok(())
}

pub fn current_user(session: &SessionState) -> Option<UserProfile> {
    session.user()
}
