//! Shared application state.

use std::sync::Arc;

use cafe_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, config: &ApiConfig) -> Self {
        AppState {
            db,
            jwt: Arc::new(JwtManager::new(
                config.jwt_secret.clone(),
                config.jwt_lifetime_secs,
            )),
        }
    }
}
