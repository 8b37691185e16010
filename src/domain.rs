use compact_str::CompactString;
use serde::Deserialize;

/// The `user`/`author`/`closed_by` objects GitHub embeds in most records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRef {
    pub login: Option<CompactString>,
    pub name: Option<CompactString>,
}

impl UserRef {
    /// The login, treating an empty string as absent
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref().filter(|l| !l.is_empty())
    }
}

/// Login of an optional embedded user
pub fn login_of(user: Option<&UserRef>) -> Option<&str> {
    user.and_then(UserRef::login)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContributorStatsDto {
    pub author: Option<UserRef>,
    pub total: Option<u64>,
    pub weeks: Option<Vec<WeekDto>>,
}

/// One week of a contributor's activity. `a` = additions, `d` = deletions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeekDto {
    pub a: Option<u64>,
    pub d: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueDto {
    pub number: Option<u64>,
    pub user: Option<UserRef>,
    pub state: Option<CompactString>,
    pub closed_by: Option<UserRef>,
    pub assignees: Option<Vec<UserRef>>,
    /// Present when the "issue" is really a pull request
    pub pull_request: Option<serde_json::Value>,
}

impl IssueDto {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.state.as_deref() == Some("closed")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestDto {
    pub number: Option<u64>,
    pub user: Option<UserRef>,
    pub merged_at: Option<CompactString>,
    pub merged_by: Option<UserRef>,
}

impl PullRequestDto {
    pub fn is_merged(&self) -> bool {
        self.merged_at.as_deref().is_some_and(|m| !m.is_empty())
    }
}

/// Issue comments and review comments share this shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentDto {
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewDto {
    pub user: Option<UserRef>,
}

/// Reviews left on a single pull request
#[derive(Debug, Clone, Default)]
pub struct PullReviews {
    pub number: u64,
    pub reviews: Vec<ReviewDto>,
}

/// Everything fetched for one repository, ready for aggregation
#[derive(Debug, Clone, Default)]
pub struct RepoActivity {
    pub contributors: Vec<ContributorStatsDto>,
    pub issues: Vec<IssueDto>,
    pub pulls: Vec<PullRequestDto>,
    pub issue_comments: Vec<CommentDto>,
    pub review_comments: Vec<CommentDto>,
    /// In pull request order
    pub reviews: Vec<PullReviews>,
}
