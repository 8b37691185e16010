use clap::Parser;
use repotally::{app_init, cli::Cli, result::AppError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Err(e) = app_init::run(cli).await {
        eprintln!("{}", report(&e));
    }

    Ok(())
}

/// Errors are reported, never turned into a failing exit status
fn report(e: &AppError) -> String {
    if e.is_api_error() {
        format!("GitHub API error: {e}")
    } else if e.is_validation_error() {
        format!("Invalid repository: {e}")
    } else {
        format!("Unexpected error: {e}")
    }
}

#[cfg(test)]
mod tests {
    use repotally::client::ClientError;

    use super::*;

    #[test]
    fn github_errors_are_reported_as_api_errors() {
        let e = AppError::from(ClientError::not_found("Repo octo/hello"));
        assert_eq!(report(&e), "GitHub API error: Repo octo/hello not found.");

        let e = AppError::from(ClientError::rate_limit(None));
        assert_eq!(
            report(&e),
            "GitHub API error: Hit GitHub API rate limit. Set GITHUB_TOKEN env var."
        );
    }

    #[test]
    fn bad_repository_input_is_reported_as_invalid() {
        let e = AppError::invalid_repo("not-a-repo", "Invalid repo format");
        assert_eq!(report(&e), "Invalid repository: Invalid repo format: not-a-repo");
    }

    #[test]
    fn everything_else_is_unexpected() {
        let e = AppError::general("Failed to initialize logging: busy");
        assert_eq!(report(&e), "Unexpected error: Failed to initialize logging: busy");

        let e = AppError::from(ClientError::InvalidUrl { url: "ftp://x".into() });
        assert_eq!(report(&e), "Unexpected error: Invalid URL: ftp://x");
    }
}
