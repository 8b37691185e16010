//! Configuration management for GitHub client

use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;

use super::error::{ClientError, Result};
use crate::config::AppConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Largest page size the GitHub REST API accepts
pub const MAX_PER_PAGE: u32 = 100;

/// Main configuration for GitHub client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GitHub instance base URL
    pub base_url: CompactString,
    /// Personal access token, sent as a bearer token when present
    pub token: Option<CompactString>,
    /// Request configuration
    pub request: RequestConfig,
    /// Contributor statistics polling
    pub stats_poll: StatsPollConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Number of items per page for paginated requests
    pub per_page: u32,
    /// Request timeout, transport default when unset
    pub timeout: Option<Duration>,
}

/// How long to wait for GitHub to finish computing contributor statistics.
///
/// The stats endpoint answers `202 Accepted` until the numbers are ready.
#[derive(Debug, Clone)]
pub struct StatsPollConfig {
    /// Total number of requests, including the first
    pub attempts: u32,
    /// Pause between consecutive requests
    pub interval: Duration,
}

/// Debug and logging configuration
#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    /// Directory to dump raw response bodies into
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { per_page: MAX_PER_PAGE, timeout: None }
    }
}

impl Default for StatsPollConfig {
    fn default() -> Self {
        Self { attempts: 6, interval: Duration::from_secs(5) }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<CompactString>, token: Option<CompactString>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.filter(|t| !t.is_empty()),
            request: RequestConfig::default(),
            stats_poll: StatsPollConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config_validation(
                "github_url",
                "Base URL cannot be empty",
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config_validation(
                "github_url",
                "Base URL must start with http:// or https://",
            ));
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(ClientError::config_validation(
                "github_url",
                "Base URL is not a valid URL format",
            ));
        }

        if self.request.per_page == 0 || self.request.per_page > MAX_PER_PAGE {
            return Err(ClientError::config_validation(
                "per_page",
                "per_page must be between 1 and 100",
            ));
        }

        if self.request.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::config_validation(
                "request_timeout_secs",
                "Timeout must be greater than zero",
            ));
        }

        if self.stats_poll.attempts == 0 {
            return Err(ClientError::config_validation(
                "stats_attempts",
                "At least one attempt is required",
            ));
        }

        Ok(())
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl From<&AppConfig> for ClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self::new(config.github_url.clone(), config.github_token.clone())
            .with_request(RequestConfig {
                per_page: config.per_page,
                timeout: config.request_timeout_secs.map(Duration::from_secs),
            })
            .with_stats_poll(StatsPollConfig {
                attempts: config.stats_attempts,
                interval: Duration::from_secs(config.stats_interval_secs),
            })
    }
}

impl ClientConfig {
    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Set contributor statistics polling
    pub fn with_stats_poll(mut self, stats_poll: StatsPollConfig) -> Self {
        self.stats_poll = stats_poll;
        self
    }

    /// Dump every response body into `dir`
    pub fn with_response_dumps(mut self, dir: Option<PathBuf>) -> Self {
        self.debug.log_directory = dir;
        self
    }
}
