//! # App Settings
//!
//! Device-level settings: where the API is, where local data lives, and
//! whether to skip the network entirely.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults            api_url = http://127.0.0.1:3000, online        │
//! │  2. settings.toml       <config dir>/settings.toml, if present          │
//! │  3. Environment         CAFE_API_URL, CAFE_DATA_DIR, CAFE_OFFLINE        │
//! │  4. validate()          bad values fail at startup, not mid-order       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Config dir per platform (via `directories`):
//! - Linux: `~/.config/cafe-app/`
//! - macOS: `~/Library/Application Support/app.cafeorder.cafe-app/`
//! - Windows: `C:\Users\<user>\AppData\Roaming\cafeorder\cafe-app\config\`

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cafe_client::{ClientConfig, DEFAULT_BASE_URL};

const SETTINGS_FILE: &str = "settings.toml";
const DATABASE_FILE: &str = "cafe.db";

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot write settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl SettingsError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Device settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Base URL of cafe-api
    pub api_url: String,

    /// Folder for the device database. `None` uses the platform data dir.
    pub data_dir: Option<PathBuf>,

    /// Never contact the API; demo data and local accounts only
    pub offline: bool,

    /// Answer failed reads with demo data
    pub demo_fallback: bool,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            api_url: DEFAULT_BASE_URL.to_string(),
            data_dir: None,
            offline: false,
            demo_fallback: true,
            request_timeout_secs: 10,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("app", "cafeorder", "cafe-app")
}

impl AppSettings {
    /// Settings file location for this platform.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Loads from the default file and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::default_path();
        Self::load_from(path.as_deref(), |key| env::var(key).ok())
    }

    /// Loads from `path` (skipped when missing) and applies overrides.
    pub fn load_from<F>(path: Option<&Path>, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match path {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Reading settings file");
                let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&raw)?
            }
            _ => AppSettings::default(),
        };

        settings.apply_overrides(lookup)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Applies `CAFE_API_URL`, `CAFE_DATA_DIR` and `CAFE_OFFLINE`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CAFE_API_URL") {
            self.api_url = url.trim().to_string();
        }
        if let Some(dir) = lookup("CAFE_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(raw) = lookup("CAFE_OFFLINE") {
            self.offline = parse_flag(&raw)
                .ok_or_else(|| SettingsError::invalid("CAFE_OFFLINE", "expected true or false"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SettingsError::invalid("api_url", "must start with http:// or https://"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err(SettingsError::invalid(
                "request_timeout_secs",
                "must be between 1 and 120",
            ));
        }
        Ok(())
    }

    /// Writes the settings as TOML, creating the parent folder.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).map_err(io_err)
    }

    /// Folder for the device database.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(DATABASE_FILE)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.trim())
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .fallback_enabled(self.demo_fallback)
            .offline(self.offline)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let settings = AppSettings::load_from(Some(&path), lookup(&[])).unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_file_then_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            "api_url = \"https://api.example.com\"\nrequest_timeout_secs = 5\n",
        )
        .unwrap();

        let settings = AppSettings::load_from(
            Some(&path),
            lookup(&[("CAFE_OFFLINE", "yes"), ("CAFE_DATA_DIR", "/tmp/cafe")]),
        )
        .unwrap();

        assert_eq!(settings.api_url, "https://api.example.com");
        assert_eq!(settings.request_timeout_secs, 5);
        assert!(settings.offline);
        assert_eq!(settings.database_path(), PathBuf::from("/tmp/cafe/cafe.db"));

        let client = settings.client_config();
        assert!(client.offline);
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppSettings::load_from(None, lookup(&[("CAFE_API_URL", "ftp://x")])).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));

        assert!(AppSettings::load_from(None, lookup(&[("CAFE_OFFLINE", "maybe")])).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = AppSettings {
            offline: true,
            ..AppSettings::default()
        };

        settings.save_to(&path).unwrap();
        let loaded = AppSettings::load_from(Some(&path), lookup(&[])).unwrap();
        assert_eq!(loaded, settings);
    }
}
