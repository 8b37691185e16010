//! Error types for the GitHub client

use compact_str::CompactString;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response from {endpoint}: {message}")]
    JsonParse {
        endpoint: String,
        message: CompactString,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message}")]
    GithubApi { message: CompactString },

    #[error("{resource} not found.")]
    NotFound { resource: CompactString },

    #[error("Hit GitHub API rate limit. Set GITHUB_TOKEN env var.")]
    RateLimit { retry_after: Option<u64> },

    #[error("Authentication failed. Check that GITHUB_TOKEN is valid.")]
    Authentication,

    #[error("Invalid configuration for {field}: {message}")]
    ConfigValidation { field: &'static str, message: &'static str },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl ClientError {
    pub fn json_parse(
        endpoint: impl Into<String>,
        message: impl Into<CompactString>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse { endpoint: endpoint.into(), message: message.into(), source }
    }

    pub fn github_api(message: impl Into<CompactString>) -> Self {
        Self::GithubApi { message: message.into() }
    }

    pub fn not_found(resource: impl Into<CompactString>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    pub fn rate_limit(retry_after: Option<u64>) -> Self {
        Self::RateLimit { retry_after }
    }

    pub fn config_validation(field: &'static str, message: &'static str) -> Self {
        Self::ConfigValidation { field, message }
    }

    /// Whether GitHub answered with an error status, as opposed to a
    /// transport, parse or configuration failure on our side
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            ClientError::GithubApi { .. }
                | ClientError::NotFound { .. }
                | ClientError::RateLimit { .. }
                | ClientError::Authentication
        )
    }
}
