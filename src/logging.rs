//! Logging setup.
//!
//! Everything goes to stderr, and optionally to a log file; stdout is left
//! for the statistics table.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_FILE_NAME: &str = "repotally.log";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Also write logs to `<log_dir>/repotally.log`
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), log_dir: None }
    }
}

impl LoggingConfig {
    /// Pick the first level that is set: command line, then config file
    pub fn new(cli_level: Option<&str>, config_level: Option<&str>, log_dir: Option<PathBuf>) -> Self {
        let level = cli_level
            .or(config_level)
            .map(normalize_level)
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string();
        Self { level, log_dir }
    }

    /// `RUST_LOG` wins over the configured level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

fn normalize_level(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        "off" | "none" => "off",
        _ => DEFAULT_LOG_LEVEL,
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
pub fn init_logging(config: &LoggingConfig) -> std::io::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    // A subscriber may already be installed (tests); keep it
    let _ = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(guard)
}
