//! Fixed-width text rendering of a [`StatsTable`]

use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

use crate::stats::{StatsTable, UserStats};

pub const EMPTY_MESSAGE: &str = "No stats found (maybe no commits / issues / PRs?).";

const HEADERS: [&str; 12] = [
    "User",
    "Commits",
    "Additions",
    "Deletions",
    "Issues Opened",
    "Issues Closed",
    "Issues Assigned",
    "PRs Opened",
    "PRs Merged",
    "PR Reviews",
    "Review Comments",
    "Issue Comments",
];

/// Render `table` as a bordered table, one row per user, in first-seen order
pub fn render_table(table: &StatsTable) -> String {
    if table.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let rows: Vec<[String; 12]> = table.iter().map(row).collect();

    let mut widths: [usize; 12] = HEADERS.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let separator = format!(
        "+-{}-+",
        widths.iter().map(|w| "-".repeat(*w)).join("-+-")
    );

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format_row(&HEADERS, &widths));
    out.push_str(&separator);
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row, &widths));
    }
    out.push_str(&separator);
    out.push('\n');
    out
}

fn row(user: &UserStats) -> [String; 12] {
    [
        user.login.to_string(),
        format_int(user.total_commits),
        format_int(user.total_additions),
        format_int(user.total_deletions),
        format_int(user.issues_opened),
        format_int(user.issues_closed),
        format_int(user.issues_assigned),
        format_int(user.pulls_opened),
        format_int(user.pulls_merged),
        format_int(user.pull_reviews),
        format_int(user.review_comments),
        format_int(user.issue_comments),
    ]
}

fn format_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let cells = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell.as_ref(), *width))
        .join(" | ");
    format!("| {cells} |\n")
}

/// Left-align `cell` in `width` terminal columns
fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(fill))
}

/// `1234567` -> `1,234,567`
pub fn format_int(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
