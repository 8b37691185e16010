use std::path::PathBuf;

use clap::Parser;

/// Measure per-user contribution for a GitHub repository.
#[derive(Debug, Parser)]
#[command(name = "repotally", version, about)]
pub struct Cli {
    /// Repository, e.g. "owner/repo" or "https://github.com/owner/repo".
    /// Prompted for when omitted.
    pub repo: Option<String>,

    /// Configuration file (defaults to <config dir>/repotally.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the statistics as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log level: trace, debug, info, warn, error or off
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Also write logs to a file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write every API response body to this directory
    #[arg(long, value_name = "DIR")]
    pub dump_responses: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub init_config: bool,
}
