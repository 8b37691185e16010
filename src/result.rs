use std::path::PathBuf;

use compact_str::{CompactString, ToCompactString};
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{reason}: {input}")]
    InvalidRepo { input: String, reason: &'static str },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Configuration file not found: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Failed to load configuration from {path}: {message}")]
    ConfigLoadError { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    ConfigSaveError { path: PathBuf, message: String },

    #[error("Failed to read repository from stdin: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("{0}")]
    GeneralError(CompactString),
}

impl AppError {
    /// Create a repository identifier validation error
    pub fn invalid_repo(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidRepo { input: input.into(), reason }
    }

    /// Create a configuration file not found error
    pub fn config_file_not_found(path: PathBuf) -> Self {
        Self::ConfigFileNotFound { path }
    }

    /// Create a configuration load error
    pub fn config_load_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigLoadError { path, message: source.to_string() }
    }

    /// Create a configuration save error
    pub fn config_save_error(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::ConfigSaveError { path, message: source.to_string() }
    }

    pub fn general(message: impl std::fmt::Display) -> Self {
        Self::GeneralError(message.to_compact_string())
    }

    /// True when the error came back from the GitHub API itself
    pub fn is_api_error(&self) -> bool {
        matches!(self, AppError::Client(e) if e.is_api_error())
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, AppError::InvalidRepo { .. })
    }
}
