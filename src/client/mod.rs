//! GitHub client modules
//!
//! The HTTP adapter, pagination and the individual fetchers live in
//! [`api`] and [`pagination`]; [`service`] runs them in sequence.

pub mod api;
pub mod config;
pub mod error;
pub mod pagination;
pub mod service;

// Re-export main types for convenience
pub use api::GithubApi;
pub use config::ClientConfig;
pub use error::ClientError;
pub use pagination::Paginator;
pub use service::GithubService;

pub type Result<T> = std::result::Result<T, ClientError>;
