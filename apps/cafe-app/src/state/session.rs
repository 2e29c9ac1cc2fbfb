//! # Session State
//!
//! The selected cafe and the signed-in user.
//!
//! Both survive restarts through the device store (`selected_cafe`,
//! `auth_state`). The in-memory copy is the one commands read; the stored
//! copy is written whenever it changes.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use cafe_core::{Cafe, UserProfile};
use cafe_db::{DbResult, KvStore};

use crate::storage;

/// Who is signed in, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: UserProfile,

    /// API bearer token. `None` for a device-only (offline) account.
    pub token: Option<String>,

    /// True when the account lives only in the device database.
    pub offline: bool,

    pub signed_in_at: DateTime<Utc>,
}

impl AuthState {
    pub fn can_manage(&self) -> bool {
        self.user.role.can_manage()
    }
}

#[derive(Debug, Default)]
struct Session {
    cafe: Option<Cafe>,
    auth: Option<AuthState>,
}

#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<Session>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the selected cafe and auth state from the device store.
    pub async fn restore(kv: &KvStore) -> DbResult<Self> {
        let cafe = kv.get_json_or_discard::<Cafe>(storage::SELECTED_CAFE).await?;
        let auth = kv.get_json_or_discard::<AuthState>(storage::AUTH_STATE).await?;
        debug!(
            cafe = cafe.as_ref().map(|c| c.id.as_str()),
            signed_in = auth.is_some(),
            "Session restored"
        );
        Ok(SessionState {
            inner: RwLock::new(Session { cafe, auth }),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Cafe
    // =========================================================================

    pub fn cafe(&self) -> Option<Cafe> {
        self.read().cafe.clone()
    }

    pub fn cafe_id(&self) -> Option<String> {
        self.read().cafe.as_ref().map(|c| c.id.clone())
    }

    pub async fn select_cafe(&self, kv: &KvStore, cafe: Cafe) -> DbResult<()> {
        kv.set_json(storage::SELECTED_CAFE, &cafe).await?;
        self.write().cafe = Some(cafe);
        Ok(())
    }

    pub async fn clear_cafe(&self, kv: &KvStore) -> DbResult<()> {
        kv.remove(storage::SELECTED_CAFE).await?;
        self.write().cafe = None;
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    pub fn auth(&self) -> Option<AuthState> {
        self.read().auth.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().auth.as_ref().map(|a| a.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.read().auth.as_ref().and_then(|a| a.token.clone())
    }

    pub async fn sign_in(&self, kv: &KvStore, auth: AuthState) -> DbResult<()> {
        kv.set_json(storage::AUTH_STATE, &auth).await?;
        self.write().auth = Some(auth);
        Ok(())
    }

    pub async fn sign_out(&self, kv: &KvStore) -> DbResult<()> {
        kv.remove(storage::AUTH_STATE).await?;
        self.write().auth = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_core::UserRole;
    use cafe_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_session_survives_restart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();
        let data = cafe_core::demo::DemoData::generate(Utc::now());

        let session = SessionState::new();
        session.select_cafe(&kv, data.cafes[1].clone()).await.unwrap();
        session
            .sign_in(
                &kv,
                AuthState {
                    user: UserProfile {
                        id: "u-1".to_string(),
                        phone: "5321234567".to_string(),
                        name: "Ece".to_string(),
                        role: UserRole::Customer,
                        created_at: Utc::now(),
                    },
                    token: None,
                    offline: true,
                    signed_in_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let restored = SessionState::restore(&kv).await.unwrap();
        assert_eq!(restored.cafe_id().as_deref(), Some("carsi-lab"));
        assert_eq!(restored.user().unwrap().name, "Ece");
        assert!(restored.token().is_none());

        restored.sign_out(&kv).await.unwrap();
        restored.clear_cafe(&kv).await.unwrap();
        let empty = SessionState::restore(&kv).await.unwrap();
        assert!(empty.cafe().is_none());
        assert!(empty.auth().is_none());
    }
}
