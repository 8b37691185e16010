//! Core HTTP client for GitHub API

use chrono::Local;
use compact_str::{CompactString, format_compact};
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, RETRY_AFTER, USER_AGENT},
};
use serde::Deserialize;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
    pagination::Paginator,
};
use crate::{
    domain::{
        CommentDto, ContributorStatsDto, IssueDto, PullRequestDto, PullReviews, ReviewDto,
    },
    id::RepoId,
};

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// How much of an unparseable error body ends up in the error message
const ERROR_BODY_LIMIT: usize = 200;

/// Pure HTTP client for GitHub API
#[derive(Debug)]
pub struct GithubApi {
    client: Client,
    config: ClientConfig,
}

/// GitHub API error response format
#[derive(Debug, Deserialize)]
struct GithubApiError {
    message: CompactString,
}

/// A successful response, body already read
#[derive(Debug)]
pub(crate) struct RawPage {
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawPage {
    /// A JSON array yields its elements; any other JSON value is a single record
    pub fn records(&self) -> Result<Vec<Value>> {
        if self.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value: Value = serde_json::from_str(&self.body).map_err(|e| {
            ClientError::json_parse(self.path.clone(), "Failed to parse response", e)
        })?;
        Ok(match value {
            Value::Array(items) => items,
            other => vec![other],
        })
    }
}

impl GithubApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Http)?;

        Ok(Self { client, config })
    }

    /// Walk a collection below `/repos/{owner}/{name}`.
    ///
    /// `per_page` is added with the configured page size unless `query`
    /// already sets it.
    pub fn paginate<'a>(
        &'a self,
        repo: &'a RepoId,
        path: &str,
        query: &[(&str, &str)],
    ) -> Paginator<'a> {
        let mut query: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        if !query.iter().any(|(k, _)| k == "per_page") {
            query.push(("per_page".into(), self.config.request.per_page.to_string()));
        }
        Paginator::new(self, repo, self.repo_url(repo, path), query)
    }

    /// Per-contributor commit totals and weekly additions/deletions.
    ///
    /// GitHub computes these lazily and answers `202 Accepted` until they are
    /// ready, so the request is repeated a bounded number of times. Still
    /// pending after the last attempt yields an empty list.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn get_contributor_stats(&self, repo: &RepoId) -> Result<Vec<ContributorStatsDto>> {
        let url = self.repo_url(repo, "/stats/contributors");
        let attempts = self.config.stats_poll.attempts;

        for attempt in 1..=attempts {
            let response = self.authenticated_request(&url).send().await?;
            let status = response.status();

            if status == StatusCode::ACCEPTED {
                debug!(attempt, attempts, "Contributor statistics are still being computed");
                if attempt < attempts {
                    sleep(self.config.stats_poll.interval).await;
                }
                continue;
            }

            let page = self.read_page(response).await?;
            if status == StatusCode::NO_CONTENT {
                return Ok(Vec::new());
            }
            if !status.is_success() {
                return Err(match self.handle_error_response(status, &page, repo) {
                    ClientError::GithubApi { .. } => ClientError::github_api(format_compact!(
                        "Error getting contributor stats: {} {}",
                        status.as_u16(),
                        truncate(&page.body, ERROR_BODY_LIMIT)
                    )),
                    classified => classified,
                });
            }

            let value: Value = serde_json::from_str(&page.body).map_err(|e| {
                ClientError::json_parse(page.path.clone(), "Failed to parse response", e)
            })?;
            return match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| {
                        serde_json::from_value(item).map_err(|e| {
                            ClientError::json_parse(page.path.clone(), "Unexpected record", e)
                        })
                    })
                    .collect(),
                _ => Ok(Vec::new()),
            };
        }

        warn!(attempts, "Contributor statistics still not ready, continuing without them");
        Ok(Vec::new())
    }

    /// Every issue regardless of state. Pull requests show up here too.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn get_issues(&self, repo: &RepoId) -> Result<Vec<IssueDto>> {
        self.paginate(repo, "/issues", &[("state", "all")])
            .collect_as()
            .await
    }

    /// Every pull request regardless of state
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn get_pull_requests(&self, repo: &RepoId) -> Result<Vec<PullRequestDto>> {
        self.paginate(repo, "/pulls", &[("state", "all")])
            .collect_as()
            .await
    }

    /// Comments on issues and pull requests alike
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn get_issue_comments(&self, repo: &RepoId) -> Result<Vec<CommentDto>> {
        self.paginate(repo, "/issues/comments", &[])
            .collect_as()
            .await
    }

    /// Comments on pull request diffs
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn get_review_comments(&self, repo: &RepoId) -> Result<Vec<CommentDto>> {
        self.paginate(repo, "/pulls/comments", &[])
            .collect_as()
            .await
    }

    /// Reviews for each of `pulls`, one listing per pull request.
    ///
    /// Pull requests without a number are skipped.
    #[instrument(skip(self, repo, pulls), fields(repo = %repo, pulls = pulls.len()))]
    pub async fn get_pull_reviews(
        &self,
        repo: &RepoId,
        pulls: &[PullRequestDto],
    ) -> Result<Vec<PullReviews>> {
        let mut result = Vec::with_capacity(pulls.len());

        for number in pulls.iter().filter_map(|pr| pr.number).filter(|n| *n != 0) {
            let reviews: Vec<ReviewDto> = self
                .paginate(repo, &format!("/pulls/{number}/reviews"), &[])
                .collect_as()
                .await?;
            debug!(number, review_count = reviews.len(), "Fetched pull request reviews");
            result.push(PullReviews { number, reviews });
        }

        info!(pulls_with_number = result.len(), "Fetched reviews for pull requests");
        Ok(result)
    }

    /// GET `url`, failing on any non-success status
    pub(crate) async fn fetch(
        &self,
        repo: &RepoId,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RawPage> {
        let mut request = self.authenticated_request(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        let page = self.read_page(response).await?;

        if status.is_success() {
            Ok(page)
        } else {
            Err(self.handle_error_response(status, &page, repo))
        }
    }

    /// Create authenticated request builder
    fn authenticated_request(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_GITHUB_JSON)
            .header(USER_AGENT, concat!("repotally/", env!("CARGO_PKG_VERSION")));

        match &self.config.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn read_page(&self, response: Response) -> Result<RawPage> {
        let path = response.url().path().to_string();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if self.config.debug.log_directory.is_some() {
            self.log_response_to_file(&path, &body);
        }

        Ok(RawPage { path, headers, body })
    }

    /// Translate an error status into a [`ClientError`]
    fn handle_error_response(&self, status: StatusCode, page: &RawPage, repo: &RepoId) -> ClientError {
        match status.as_u16() {
            401 => ClientError::Authentication,
            403 if page.body.to_lowercase().contains("rate limit") => {
                ClientError::rate_limit(retry_after(&page.headers))
            },
            429 => ClientError::rate_limit(retry_after(&page.headers)),
            404 => ClientError::not_found(format_compact!("Repo {repo}")),
            code => {
                let detail = serde_json::from_str::<GithubApiError>(&page.body)
                    .map(|e| e.message)
                    .unwrap_or_else(|_| truncate(&page.body, ERROR_BODY_LIMIT).into());
                ClientError::github_api(format_compact!("HTTP {code}: {detail}"))
            },
        }
    }

    /// Build the URL of a resource below `/repos/{owner}/{name}`
    fn repo_url(&self, repo: &RepoId, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.config.base_url.trim_end_matches('/'),
            repo.owner(),
            repo.name(),
            path
        )
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists()
                && let Err(e) = std::fs::create_dir_all(log_dir)
            {
                warn!("Failed to create response dump directory: {}", e);
                return;
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
                path.trim_start_matches('/').replace('/', "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response dump to {:?}: {}", log_path, e);
            } else {
                debug!("Response dumped to {:?}", log_path);
            }
        }
    }
}

fn retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}

/// First `limit` characters of `s`
fn truncate(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
