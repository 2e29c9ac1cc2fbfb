//! # Client Configuration

use std::time::Duration;

/// Where the API lives and how long to wait for it.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use cafe_client::ClientConfig;
///
/// let config = ClientConfig::new("https://api.cafeorder.app")
///     .timeout(Duration::from_secs(5))
///     .fallback_enabled(false);
/// assert_eq!(config.base_url, "https://api.cafeorder.app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash.
    pub base_url: String,

    /// Per-request timeout.
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Answer failed reads from the demo catalog.
    /// Default: true
    pub fallback_enabled: bool,

    /// Never contact the API; every read is answered from the demo catalog.
    /// Default: false
    pub offline: bool,
}

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
            fallback_enabled: true,
            offline: false,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fallback_enabled(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("http://localhost:3000///");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.fallback_enabled);
        assert!(!config.offline);
    }
}
