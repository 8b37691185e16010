use std::path::{Path, PathBuf};

use compact_str::CompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    client::config::{DEFAULT_BASE_URL, MAX_PER_PAGE},
    result::{AppError, Result},
};

/// Environment variable holding the GitHub access token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub github_url: CompactString,
    pub github_token: Option<CompactString>,
    pub log_level: Option<String>,
    pub per_page: u32,
    pub stats_attempts: u32,
    pub stats_interval_secs: u64,
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_url: DEFAULT_BASE_URL.into(),
            github_token: None,
            log_level: None,
            per_page: MAX_PER_PAGE,
            stats_attempts: 6,
            stats_interval_secs: 5,
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Let a non-empty token from the environment take precedence
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.github_token = Some(token.trim().into());
        }
        self
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("repotally.toml")
    } else {
        PathBuf::from("repotally.toml")
    }
}

/// Load the configuration file.
///
/// An explicitly requested file must exist. The default location is
/// optional and falls back to built-in defaults without creating a file.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(AppError::config_file_not_found(path.to_path_buf()));
        },
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path();
            if !path.exists() {
                debug!(path = %path.display(), "No configuration file, using defaults");
                return Ok(AppConfig::default());
            }
            path
        },
    };

    debug!(path = %path.display(), "Loading configuration");
    confy::load_path(&path).map_err(|e| AppError::config_load_error(path, e))
}

pub fn save_config(config_file: &Path, config: &AppConfig) -> Result<()> {
    confy::store_path(config_file, config)
        .map_err(|e| AppError::config_save_error(config_file.to_path_buf(), e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::client::ClientConfig;

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, AppError::ConfigFileNotFound { .. }));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("repotally.toml");
        fs::write(&path, "stats_attempts = 2\nlog_level = \"debug\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.stats_attempts, 2);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.github_url, DEFAULT_BASE_URL);
        assert_eq!(config.per_page, 100);
    }

    #[test]
    fn saved_config_loads_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("repotally.toml");
        let config = AppConfig {
            github_url: "https://github.example.com/api/v3".into(),
            request_timeout_secs: Some(30),
            ..Default::default()
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), config);
    }

    #[test]
    fn env_token_overrides_file_token() {
        let config = AppConfig { github_token: Some("from-file".into()), ..Default::default() };

        let kept = config.clone().with_env_token(Some("  ".into()));
        assert_eq!(kept.github_token.as_deref(), Some("from-file"));

        let replaced = config.with_env_token(Some("from-env".into()));
        assert_eq!(replaced.github_token.as_deref(), Some("from-env"));
    }

    #[test]
    fn converts_into_client_config() {
        let config = AppConfig {
            stats_attempts: 3,
            stats_interval_secs: 0,
            request_timeout_secs: Some(10),
            ..Default::default()
        };

        let client = ClientConfig::from(&config);

        assert_eq!(client.stats_poll.attempts, 3);
        assert!(client.stats_poll.interval.is_zero());
        assert_eq!(client.request.timeout, Some(std::time::Duration::from_secs(10)));
        assert!(!client.has_token());
        assert!(client.validate().is_ok());
    }
}
