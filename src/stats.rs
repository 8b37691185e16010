//! Per-user contribution counters

use std::collections::HashMap;

use compact_str::CompactString;
use serde::Serialize;

use crate::domain::{RepoActivity, UserRef, login_of};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub login: CompactString,
    pub name: Option<CompactString>,
    pub total_commits: u64,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub issues_opened: u64,
    pub issues_closed: u64,
    pub issues_assigned: u64,
    pub pulls_opened: u64,
    pub pulls_merged: u64,
    pub pull_reviews: u64,
    pub review_comments: u64,
    pub issue_comments: u64,
}

impl UserStats {
    fn new(login: &str) -> Self {
        Self { login: login.into(), ..Default::default() }
    }
}

/// Users in the order they were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsTable {
    users: Vec<UserStats>,
    login_lookup: HashMap<CompactString, usize>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `login`, created with zeroed counters on first use
    pub fn entry(&mut self, login: &str) -> &mut UserStats {
        let idx = match self.login_lookup.get(login) {
            Some(&idx) => idx,
            None => {
                self.users.push(UserStats::new(login));
                let idx = self.users.len() - 1;
                self.login_lookup.insert(login.into(), idx);
                idx
            },
        };
        &mut self.users[idx]
    }

    pub fn get(&self, login: &str) -> Option<&UserStats> {
        self.login_lookup
            .get(login)
            .map(|&idx| &self.users[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserStats> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &[UserStats] {
        &self.users
    }
}

impl<'a> IntoIterator for &'a StatsTable {
    type Item = &'a UserStats;
    type IntoIter = std::slice::Iter<'a, UserStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.users.iter()
    }
}

/// Build per-user statistics from everything fetched for a repository.
///
/// Records without a usable login are skipped for the step that needed it.
pub fn aggregate(activity: &RepoActivity) -> StatsTable {
    let mut table = StatsTable::new();

    tally_contributors(&mut table, activity);
    tally_issues(&mut table, activity);
    tally_pulls(&mut table, activity);

    for login in activity.issue_comments.iter().filter_map(|c| login_of(c.user.as_ref())) {
        table.entry(login).issue_comments += 1;
    }

    for login in activity.review_comments.iter().filter_map(|c| login_of(c.user.as_ref())) {
        table.entry(login).review_comments += 1;
    }

    for login in activity
        .reviews
        .iter()
        .flat_map(|pr| &pr.reviews)
        .filter_map(|r| login_of(r.user.as_ref()))
    {
        table.entry(login).pull_reviews += 1;
    }

    table
}

fn tally_contributors(table: &mut StatsTable, activity: &RepoActivity) {
    for contributor in &activity.contributors {
        let Some(author) = &contributor.author else {
            continue;
        };
        let Some(login) = author.login() else {
            continue;
        };

        let weeks = contributor.weeks.as_deref().unwrap_or_default();
        let additions: u64 = weeks.iter().filter_map(|w| w.a).sum();
        let deletions: u64 = weeks.iter().filter_map(|w| w.d).sum();

        let user = table.entry(login);
        if user.name.is_none() {
            user.name = display_name(author);
        }
        user.total_commits += contributor.total.unwrap_or(0);
        user.total_additions += additions;
        user.total_deletions += deletions;
    }
}

fn tally_issues(table: &mut StatsTable, activity: &RepoActivity) {
    for issue in activity.issues.iter().filter(|i| !i.is_pull_request()) {
        if let Some(creator) = login_of(issue.user.as_ref()) {
            table.entry(creator).issues_opened += 1;
        }

        if issue.is_closed()
            && let Some(closer) = login_of(issue.closed_by.as_ref())
        {
            table.entry(closer).issues_closed += 1;
        }

        for assignee in issue.assignees.iter().flatten().filter_map(UserRef::login) {
            table.entry(assignee).issues_assigned += 1;
        }
    }
}

fn tally_pulls(table: &mut StatsTable, activity: &RepoActivity) {
    for pr in &activity.pulls {
        let creator = login_of(pr.user.as_ref());
        if let Some(creator) = creator {
            table.entry(creator).pulls_opened += 1;
        }

        // Without merged_by the author is credited with the merge
        if pr.is_merged()
            && let Some(merger) = login_of(pr.merged_by.as_ref()).or(creator)
        {
            table.entry(merger).pulls_merged += 1;
        }
    }
}

fn display_name(author: &UserRef) -> Option<CompactString> {
    author.name.clone().filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{
        CommentDto, ContributorStatsDto, IssueDto, PullRequestDto, PullReviews, ReviewDto,
    };

    fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn user(login: &str) -> Option<UserRef> {
        Some(UserRef { login: Some(login.into()), name: None })
    }

    fn comment(login: &str) -> CommentDto {
        CommentDto { user: user(login) }
    }

    fn only(table: &StatsTable, login: &str) -> UserStats {
        table.get(login).cloned().unwrap_or_else(|| panic!("{login} missing"))
    }

    #[test]
    fn issue_creator_closer_and_assignee_are_credited() {
        let activity = RepoActivity {
            issues: vec![from_json(json!({
                "number": 1,
                "state": "closed",
                "user": {"login": "alice"},
                "closed_by": {"login": "bob"},
                "assignees": [{"login": "carol"}],
            }))],
            ..Default::default()
        };

        let table = aggregate(&activity);

        assert_eq!(table.len(), 3);
        assert_eq!(
            only(&table, "alice"),
            UserStats { issues_opened: 1, ..UserStats::new("alice") }
        );
        assert_eq!(only(&table, "bob"), UserStats { issues_closed: 1, ..UserStats::new("bob") });
        assert_eq!(
            only(&table, "carol"),
            UserStats { issues_assigned: 1, ..UserStats::new("carol") }
        );
    }

    #[test]
    fn closed_by_only_counts_for_closed_issues() {
        let activity = RepoActivity {
            issues: vec![from_json(json!({
                "state": "open",
                "user": {"login": "alice"},
                "closed_by": {"login": "bob"},
            }))],
            ..Default::default()
        };

        let table = aggregate(&activity);
        assert!(table.get("bob").is_none());
    }

    #[test]
    fn merge_credits_merger_not_author() {
        let activity = RepoActivity {
            pulls: vec![from_json(json!({
                "number": 5,
                "user": {"login": "dave"},
                "merged_at": "2024-01-02T03:04:05Z",
                "merged_by": {"login": "erin"},
            }))],
            ..Default::default()
        };

        let table = aggregate(&activity);

        assert_eq!(only(&table, "dave").pulls_opened, 1);
        assert_eq!(only(&table, "dave").pulls_merged, 0);
        assert_eq!(only(&table, "erin").pulls_merged, 1);
        assert_eq!(only(&table, "erin").pulls_opened, 0);
    }

    #[test]
    fn merge_without_merger_falls_back_to_author() {
        let activity = RepoActivity {
            pulls: vec![
                from_json(json!({
                    "number": 6,
                    "user": {"login": "frank"},
                    "merged_at": "2024-01-02T03:04:05Z",
                })),
                from_json(json!({
                    "number": 7,
                    "user": {"login": "frank"},
                    "merged_at": null,
                })),
                from_json(json!({
                    "number": 8,
                    "user": {"login": "frank"},
                    "merged_at": "",
                })),
            ],
            ..Default::default()
        };

        let table = aggregate(&activity);
        assert_eq!(only(&table, "frank").pulls_opened, 3);
        assert_eq!(only(&table, "frank").pulls_merged, 1);
    }

    #[test]
    fn pull_request_issues_are_not_issues() {
        let activity = RepoActivity {
            issues: vec![from_json(json!({
                "number": 9,
                "state": "closed",
                "user": {"login": "gina"},
                "closed_by": {"login": "hank"},
                "assignees": [{"login": "ivan"}],
                "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/9"},
            }))],
            ..Default::default()
        };

        assert!(aggregate(&activity).is_empty());
    }

    #[test]
    fn contributor_totals_and_weeks_are_summed() {
        let activity = RepoActivity {
            contributors: vec![
                from_json(json!({
                    "author": {"login": "alice", "name": "Alice A."},
                    "total": 12,
                    "weeks": [{"w": 1, "a": 100, "d": 10, "c": 5}, {"w": 2, "a": 1, "d": 2, "c": 7}],
                })),
                from_json(json!({"author": null, "total": 99, "weeks": []})),
                from_json(json!({"author": {"login": ""}, "total": 99})),
            ],
            ..Default::default()
        };

        let table = aggregate(&activity);

        assert_eq!(table.len(), 1);
        let alice = only(&table, "alice");
        assert_eq!(alice.name.as_deref(), Some("Alice A."));
        assert_eq!(alice.total_commits, 12);
        assert_eq!(alice.total_additions, 101);
        assert_eq!(alice.total_deletions, 12);
    }

    #[test]
    fn comments_and_reviews_are_counted_per_author() {
        let activity = RepoActivity {
            issue_comments: vec![comment("alice"), comment("alice"), CommentDto::default()],
            review_comments: vec![comment("bob")],
            reviews: vec![
                PullReviews {
                    number: 1,
                    reviews: vec![ReviewDto { user: user("carol") }, ReviewDto { user: None }],
                },
                PullReviews { number: 2, reviews: vec![ReviewDto { user: user("carol") }] },
            ],
            ..Default::default()
        };

        let table = aggregate(&activity);

        assert_eq!(only(&table, "alice").issue_comments, 2);
        assert_eq!(only(&table, "bob").review_comments, 1);
        assert_eq!(only(&table, "carol").pull_reviews, 2);
    }

    #[test]
    fn users_keep_first_seen_order() {
        let activity = RepoActivity {
            contributors: vec![ContributorStatsDto {
                author: user("zed"),
                total: Some(1),
                weeks: None,
            }],
            issues: vec![IssueDto { user: user("amy"), ..Default::default() }],
            pulls: vec![PullRequestDto { user: user("zed"), ..Default::default() }],
            issue_comments: vec![comment("max")],
            ..Default::default()
        };

        let table = aggregate(&activity);
        let logins: Vec<&str> = table.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, ["zed", "amy", "max"]);
    }

    #[test]
    fn aggregating_twice_gives_the_same_table() {
        let activity = RepoActivity {
            issues: vec![from_json(json!({
                "state": "closed",
                "user": {"login": "alice"},
                "closed_by": {"login": "bob"},
            }))],
            pulls: vec![from_json(json!({
                "user": {"login": "alice"},
                "merged_at": "2024-01-01T00:00:00Z",
            }))],
            issue_comments: vec![comment("bob")],
            ..Default::default()
        };

        assert_eq!(aggregate(&activity), aggregate(&activity));
    }
}
