//! Server configuration module.
//!
//! Configuration is loaded from environment variables (and a `.env` file
//! when present) with fallback to defaults.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEV_JWT_SECRET: &str = "cafe-api-dev-secret-change-in-production";

/// Cafe API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Load the demo network into the database on startup
    pub seed_demo: bool,
}

impl ApiConfig {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is the normal case in production
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            port: parse_or(&lookup, "CAFE_API_PORT", 3000)?,

            db_path: lookup("CAFE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("cafe_api.db")),

            jwt_secret: lookup("JWT_SECRET").unwrap_or_else(|| {
                warn!("JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }),

            jwt_lifetime_secs: parse_or(&lookup, "JWT_LIFETIME_SECS", 86_400)?, // 1 day

            seed_demo: parse_or(&lookup, "CAFE_SEED_DEMO", true)?,
        };

        if config.jwt_secret.len() < 16 {
            return Err(ConfigError::InvalidValue("JWT_SECRET".to_string()));
        }
        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()));
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
