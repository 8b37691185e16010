//! Per-user contribution statistics for a GitHub repository.
//!
//! [`client`] talks to the GitHub REST API, [`stats`] folds the fetched
//! records into a [`stats::StatsTable`] and [`table`] renders it.

pub mod app_init;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod id;
pub mod logging;
pub mod result;
pub mod stats;
pub mod table;
