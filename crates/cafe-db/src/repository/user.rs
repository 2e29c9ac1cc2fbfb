//! # User Repository
//!
//! Accounts keyed by canonical phone number. Callers normalize the phone
//! (`cafe_core::validation::normalize_phone`) and hash the password
//! (`crate::password`) before calling in.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use cafe_core::{User, UserRole};

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    phone: String,
    name: String,
    password_hash: String,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            phone: row.phone,
            name: row.name,
            password_hash: row.password_hash,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

const SELECT_USER: &str = r#"
    SELECT id, phone, name, password_hash, role, created_at
    FROM users
"#;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn get_by_phone(&self, phone: &str) -> DbResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE phone = ?1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE id = ?1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Inserts a new account.
    ///
    /// ## Errors
    /// * `UniqueViolation { field: "phone" }` - phone already registered
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, role = %user.role, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, phone, name, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.phone)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.contains("phone") => {
                DbError::duplicate("phone", &user.phone)
            }
            other => other,
        })?;

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::test_support::now;

    fn user(id: &str, phone: &str, role: UserRole) -> User {
        User {
            id: id.to_string(),
            phone: phone.to_string(),
            name: "Ayşe Yılmaz".to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            role,
            created_at: now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let staff = user("u1", "5321234567", UserRole::Staff);
        db.users().insert(&staff).await.unwrap();

        assert_eq!(db.users().get_by_phone("5321234567").await.unwrap().unwrap(), staff);
        assert_eq!(db.users().get_by_id("u1").await.unwrap().unwrap().role, UserRole::Staff);
        assert!(db.users().get_by_phone("5000000000").await.unwrap().is_none());
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_phone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().insert(&user("u1", "5321234567", UserRole::Customer)).await.unwrap();

        let err = db
            .users()
            .insert(&user("u2", "5321234567", UserRole::Customer))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value } if field == "phone" && value == "5321234567"
        ));
    }
}
