//! Backend endpoint configuration.
//!
//! Configuration priority: ~/.config/jobscout/config.toml > environment
//! variables (`JOBSCOUT_BACKEND_URL`, `JOBSCOUT_POLL_INTERVAL_SECS`).

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use jobscout_core::{Result, ScoutError};

const CONFIG_DIR: &str = "jobscout";
const CONFIG_FILE: &str = "config.toml";
const BACKEND_URL_VAR: &str = "JOBSCOUT_BACKEND_URL";
const POLL_INTERVAL_VAR: &str = "JOBSCOUT_POLL_INTERVAL_SECS";

/// Reference interval between jobs snapshot polls.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Endpoints and timing for one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// HTTP base URL of the assistant backend.
    pub base_url: String,
    /// Seconds between jobs snapshot polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl ClientConfig {
    /// Creates a config for a base URL with the default poll interval.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }

    /// Loads configuration from the config file or environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/jobscout/config.toml
    /// 2. Environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error when neither source names a backend.
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path()
            && path.exists()
        {
            return Self::load_from_file(&path);
        }

        let base_url = env::var(BACKEND_URL_VAR).map_err(|_| {
            ScoutError::config(format!(
                "backend URL not found in ~/.config/{CONFIG_DIR}/{CONFIG_FILE} or {BACKEND_URL_VAR}"
            ))
        })?;

        let mut config = Self::new(base_url);
        if let Ok(interval) = env::var(POLL_INTERVAL_VAR) {
            config.poll_interval_secs = interval
                .parse()
                .map_err(|_| ScoutError::config(format!("{POLL_INTERVAL_VAR} must be an integer")))?;
        }
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| ScoutError::config(format!("cannot read {}: {err}", path.display())))?;
        let mut config: Self =
            toml::from_str(&raw).map_err(|err| ScoutError::Serialization {
                format: "TOML".to_string(),
                message: err.to_string(),
            })?;
        config.base_url = normalize_base_url(config.base_url);
        Ok(config)
    }

    /// The WebSocket base URL derived from the HTTP base URL.
    pub fn ws_url(&self) -> String {
        if let Some(rest) = self.base_url.strip_prefix("https") {
            format!("wss{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http") {
            format!("ws{rest}")
        } else {
            self.base_url.clone()
        }
    }

    /// The poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://localhost:8000/");
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn ws_url_follows_the_http_scheme() {
        assert_eq!(
            ClientConfig::new("http://localhost:8000").ws_url(),
            "ws://localhost:8000"
        );
        assert_eq!(
            ClientConfig::new("https://api.example.com").ws_url(),
            "wss://api.example.com"
        );
    }

    #[test]
    fn config_file_parses_and_defaults_the_interval() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"http://localhost:8000/\"\n").expect("write");

        let config = ClientConfig::load_from_file(&path).expect("parses");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.poll_interval_secs, 30);
    }

    #[test]
    fn config_file_overrides_the_interval() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"http://localhost:8000\"\npoll_interval_secs = 5\n",
        )
        .expect("write");

        let config = ClientConfig::load_from_file(&path).expect("parses");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = ClientConfig::load_from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.is_config());
    }
}
