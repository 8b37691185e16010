use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    cli::Cli,
    client::{ClientConfig, GithubApi, GithubService},
    config::{AppConfig, TOKEN_ENV, default_config_path, load_config, save_config},
    id::RepoId,
    logging::{LoggingConfig, init_logging},
    result::{AppError, Result},
    table::render_table,
};

pub struct AppComponents {
    pub service: GithubService,
    pub _log_guard: Option<WorkerGuard>,
}

/// Run one invocation: resolve the repository, fetch, aggregate, print
pub async fn run(cli: Cli) -> Result<()> {
    if cli.init_config {
        return write_config(cli.config);
    }

    let components = initialize_app(&cli)?;
    let repo = resolve_repo(cli.repo.as_deref())?;

    // stdout carries nothing but the document in JSON mode
    if cli.json {
        info!(%repo, "Fetching stats");
    } else {
        println!("Fetching stats for {repo} ...");
    }
    let table = components.service.repo_stats(&repo).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(table.users())
            .map_err(|e| AppError::general(format!("Failed to serialize statistics: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", render_table(&table));
    }

    Ok(())
}

pub fn initialize_app(cli: &Cli) -> Result<AppComponents> {
    let config = load_config(cli.config.as_deref())?.with_env_token(std::env::var(TOKEN_ENV).ok());

    let log_guard = initialize_logging(cli, &config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "repotally starting up");

    if config.github_token.is_none() {
        warn!(
            "{TOKEN_ENV} is not set. You may hit rate limits for non-trivial repos. \
             Set it with: export {TOKEN_ENV}='your_token_here'"
        );
    }

    let service = create_github_service(&config, cli.dump_responses.clone())?;

    Ok(AppComponents { service, _log_guard: log_guard })
}

fn initialize_logging(cli: &Cli, config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let logging_config = LoggingConfig::new(
        cli.log_level.as_deref(),
        config.log_level.as_deref(),
        cli.log_dir.clone(),
    );

    init_logging(&logging_config)
        .map_err(|e| AppError::general(format!("Failed to initialize logging: {e}")))
}

fn create_github_service(config: &AppConfig, dump_dir: Option<PathBuf>) -> Result<GithubService> {
    let client_config = ClientConfig::from(config).with_response_dumps(dump_dir);
    let api = Arc::new(GithubApi::new(client_config)?);
    Ok(GithubService::from_api(api))
}

/// Use the command line argument, or ask for the repository on stdin
fn resolve_repo(arg: Option<&str>) -> Result<RepoId> {
    match arg {
        Some(repo) => repo.parse(),
        None => {
            let stdin = io::stdin();
            prompt_repo(&mut stdin.lock(), &mut io::stdout())?.parse()
        },
    }
}

fn prompt_repo(input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(output, "Enter repo (e.g. \"owner/repo\" or \"https://github.com/owner/repo\"): ")
        .and_then(|_| output.flush())
        .map_err(AppError::Prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(AppError::Prompt)?;
    Ok(line.trim().to_string())
}

/// Store the file configuration (never the environment token) and report where
fn write_config(explicit: Option<PathBuf>) -> Result<()> {
    let path = explicit.unwrap_or_else(default_config_path);
    let config = if path.exists() { load_config(Some(&path))? } else { AppConfig::default() };
    save_config(&path, &config)?;
    println!("Wrote configuration to {}", path.display());
    Ok(())
}
