//! # Configuration
//!
//! Client settings layered from defaults, an optional file and the environment.

use std::path::Path;
use std::time::Duration;

use beatdesk_types::DEFAULT_PAGE_SIZE;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `BEATDESK__BASE_URL`.
pub const ENV_PREFIX: &str = "BEATDESK";

/// Settings shared by the client and the state stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backoffice API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Page size used when no filters were given.
    pub default_page_size: u32,
    /// Maximum length of an error message shown to the operator.
    pub message_limit: usize,
    /// Maximum number of toasts shown at once.
    pub toast_limit: usize,
    /// How long a toast stays visible, in milliseconds.
    pub toast_duration_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            timeout_secs: 30,
            user_agent: concat!("beatdesk/", env!("CARGO_PKG_VERSION")).to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            message_limit: 200,
            toast_limit: 5,
            toast_duration_ms: 5_000,
        }
    }
}

impl ClientConfig {
    /// Loads settings from `path` (if given) and `BEATDESK__*` variables.
    ///
    /// Later sources override earlier ones; anything unset keeps its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or a value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        tracing::debug!(base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Toast lifetime.
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.message_limit, 200);
        assert_eq!(config.toast_limit, 5);
        assert_eq!(config.toast_duration(), Duration::from_secs(5));
        assert_eq!(config.default_page_size, 20);
        assert!(config.user_agent.starts_with("beatdesk/"));
    }

    #[test]
    fn test_load_from_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"https://backoffice.example.com/api\"").unwrap();
        writeln!(file, "timeout_secs = 5").unwrap();
        writeln!(file, "message_limit = 120").unwrap();

        let config = ClientConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "https://backoffice.example.com/api");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.message_limit, 120);
        assert_eq!(config.toast_limit, 5);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load(Some(dir.path().join("absent.toml").as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "timeout_secs = \"soon\"").unwrap();
        assert!(ClientConfig::load(Some(file.path())).is_err());
    }
}
