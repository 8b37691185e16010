//! High-level GitHub service operations

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use super::{api::GithubApi, error::Result};
use crate::{
    domain::RepoActivity,
    id::RepoId,
    stats::{StatsTable, aggregate},
};

/// High-level service for GitHub operations
///
/// Runs the individual fetches in order and hands the results to the aggregator
#[derive(Debug, Clone)]
pub struct GithubService {
    api: Arc<GithubApi>,
}

impl GithubService {
    /// Create service from existing API client
    pub fn from_api(api: Arc<GithubApi>) -> Self {
        Self { api }
    }

    /// Fetch every collection the aggregator needs, one request at a time.
    ///
    /// The first failure aborts the whole fetch.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    pub async fn fetch_activity(&self, repo: &RepoId) -> Result<RepoActivity> {
        info!("Fetching repository activity from GitHub");

        let result = self.fetch_in_order(repo).await;
        match &result {
            Ok(activity) => debug!(
                contributors = activity.contributors.len(),
                issues = activity.issues.len(),
                pulls = activity.pulls.len(),
                issue_comments = activity.issue_comments.len(),
                review_comments = activity.review_comments.len(),
                reviewed_pulls = activity.reviews.len(),
                "Successfully fetched repository activity"
            ),
            Err(e) => error!(error = %e, "Failed to fetch repository activity"),
        }
        result
    }

    /// Fetch and aggregate per-user statistics for `repo`
    pub async fn repo_stats(&self, repo: &RepoId) -> Result<StatsTable> {
        let activity = self.fetch_activity(repo).await?;
        let table = aggregate(&activity);
        info!(users = table.len(), "Aggregated contribution statistics");
        Ok(table)
    }

    async fn fetch_in_order(&self, repo: &RepoId) -> Result<RepoActivity> {
        let contributors = self.api.get_contributor_stats(repo).await?;
        let issues = self.api.get_issues(repo).await?;
        let pulls = self.api.get_pull_requests(repo).await?;
        let issue_comments = self.api.get_issue_comments(repo).await?;
        let review_comments = self.api.get_review_comments(repo).await?;
        let reviews = self.api.get_pull_reviews(repo, &pulls).await?;

        Ok(RepoActivity {
            contributors,
            issues,
            pulls,
            issue_comments,
            review_comments,
            reviews,
        })
    }
}
