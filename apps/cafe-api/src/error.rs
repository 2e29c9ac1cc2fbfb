//! Error types for the Cafe API.
//!
//! Every handler returns `Result<_, AppError>`; the error renders as an
//! [`ErrorBody`] with the matching status code.
//!
//! ```text
//! ValidationError / bad input  → 400 VALIDATION_ERROR / BAD_REQUEST
//! missing or invalid token     → 401 UNAUTHORIZED
//! customer token on staff route→ 403 FORBIDDEN
//! DbError::NotFound            → 404 NOT_FOUND
//! DbError::UniqueViolation     → 409 CONFLICT
//! anything else                → 500 INTERNAL_ERROR (logged, message hidden)
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use cafe_core::wire::ErrorBody;
use cafe_core::{CoreError, ValidationError};
use cafe_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::NotFound(format!("{entity} {id}")),
            DbError::UniqueViolation { .. } => AppError::Conflict(err.to_string()),
            DbError::ForeignKeyViolation { message } => AppError::NotFound(message),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => AppError::Validation(e),
            CoreError::ProductNotFound(id) => AppError::NotFound(format!("Product {id}")),
            CoreError::UnknownPromo(code) => AppError::NotFound(format!("Promo code {code}")),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(detail) => {
                error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            code: self.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err: AppError = DbError::not_found("Product", "p1").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: AppError = DbError::duplicate("phone", "5321234567").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: AppError = DbError::PoolExhausted.into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_core_error_mapping() {
        let err: AppError = CoreError::EmptyCart.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: AppError = CoreError::UnknownPromo("NOPE".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
