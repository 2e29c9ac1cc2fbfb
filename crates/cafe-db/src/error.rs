//! # Storage Errors
//!
//! `DbError` names what went wrong in terms a caller can act on: a missing
//! row, a taken phone number or promo code, a dangling cafe reference.
//! The two apps translate it further:
//!
//! ```text
//! sqlx::Error / MigrateError / serde_json::Error
//!        │
//!        ▼
//!     DbError ──► AppError (cafe-api)   404 / 409 / 400 / 500
//!             └─► ApiError (cafe-app)   NOT_FOUND / CONFLICT / DATABASE_ERROR
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with that id, including updates and deletes of missing rows.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// ## When This Occurs
    /// - Registering a phone number twice
    /// - Duplicate promo code or table QR code
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Product, card or config pointing at a cafe that doesn't exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The file could not be opened, or the pool was already closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A JSON column or key-value blob could not be (de)serialized.
    ///
    /// ## When This Occurs
    /// - A stored blob was written by an older app version with another shape
    /// - A column holds an unknown enum slug
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Every connection stayed busy past `connect_timeout`.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// SQLite reports constraint failures only as message text, so the
/// message is inspected for the constraint kind.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::ColumnDecode { index, source } => {
                DbError::Serialization(format!("column {index}: {source}"))
            }

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

impl From<cafe_core::ValidationError> for DbError {
    fn from(err: cafe_core::ValidationError) -> Self {
        DbError::Serialization(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Product", "p-1");
        assert_eq!(err.to_string(), "Product not found: p-1");
        assert!(err.is_not_found());
        assert!(!DbError::PoolExhausted.is_not_found());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(DbError::from(sqlx::Error::RowNotFound).is_not_found());
    }
}
