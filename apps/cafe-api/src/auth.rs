//! JWT authentication module.
//!
//! Handles token issuing and validation, plus the extractors that guard
//! routes.
//!
//! ```text
//! Authorization: Bearer <jwt>
//!        │
//!        ▼
//! AuthUser        any valid token           (order history)
//! StaffUser       token with staff/admin    (catalog mutations, order status)
//! MaybeAuthUser   token optional            (order submission by guests)
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cafe_core::{User, UserRole};

use crate::error::AppError;
use crate::state::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Role at the time the token was issued
    pub role: UserRole,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issue an access token for a user.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn bearer_from_parts(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
}

// =============================================================================
// Extractors
// =============================================================================

/// Caller with a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_from_parts(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
        Ok(AuthUser(state.jwt.validate(token)?))
    }
}

/// Caller with a staff or admin token.
#[derive(Debug, Clone)]
pub struct StaffUser(pub Claims);

impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.role.can_manage() {
            return Err(AppError::Forbidden("Staff account required".to_string()));
        }
        Ok(StaffUser(claims))
    }
}

/// Caller who may or may not be signed in. A token that is present but
/// invalid is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Claims>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_from_parts(parts) {
            Some(token) => Ok(MaybeAuthUser(Some(state.jwt.validate(token)?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> User {
        User {
            id: "user-001".to_string(),
            phone: "5321234567".to_string(),
            name: "Deniz".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret-test-secret".to_string(), 3600);
        let token = manager.issue(&user(UserRole::Staff)).unwrap();

        let claims = manager.validate(&token).unwrap();
        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.role, UserRole::Staff);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new("issuer-secret-issuer".to_string(), 3600);
        let other = JwtManager::new("another-secret-other".to_string(), 3600);
        let token = issuer.issue(&user(UserRole::Admin)).unwrap();

        assert!(matches!(other.validate(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let manager = JwtManager::new("test-secret-test-secret".to_string(), -120);
        let token = manager.issue(&user(UserRole::Customer)).unwrap();
        assert!(manager.validate(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
