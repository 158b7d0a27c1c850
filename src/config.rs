//! Configuration types for synodl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file looked up in the user's home directory
pub const DEFAULT_CONFIG_FILE: &str = ".synodl.json";

/// Client configuration loaded from a JSON file
///
/// Only `host`, `username`, and `password` are required; everything else has
/// a sensible default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Hostname (and optional port) of the NAS, e.g. "nas.local:5001"
    pub host: String,

    /// URL scheme (default: "https")
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Account username
    pub username: String,

    /// Account password
    pub password: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read or parsed,
    /// naming the offending path in the message.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            Error::Config(format!("could not parse {}: {}", path.display(), e))
        })
    }

    /// Default config file path: `$HOME/.synodl.json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the home directory cannot be resolved.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_CONFIG_FILE))
            .ok_or_else(|| Error::Config("could not determine home directory".to_string()))
    }

    /// Per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_full_config() {
        let file = write_config(
            r#"{
                "host": "nas.local:5001",
                "scheme": "http",
                "username": "admin",
                "password": "hunter2",
                "timeout_secs": 10
            }"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.host, "nas.local:5001");
        assert_eq!(config.scheme, "http");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let file = write_config(
            r#"{"host": "nas.local", "username": "admin", "password": "hunter2"}"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scheme, "https");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/synodl.json")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/nonexistent/synodl.json"), "{message}");
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let file = write_config("not json");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
