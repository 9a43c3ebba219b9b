//! Recent-branch discovery.
//!
//! Samples the head commits of the first [`MAX_SAMPLED_BRANCHES`] branches
//! once, then looks for activity in a window that widens by
//! [`WINDOW_STEP_DAYS`] until something matches or the window passes
//! [`MAX_LOOKBACK_DAYS`]. Widening never issues new requests.

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tracing::{debug, info};

use crate::services::github_api::GitHubApiTrait;
use crate::services::ordering::sort_recent_first;
use crate::types::github::{Branch, BranchSummary};

/// Branches whose head commit is looked up; bounds API calls per view.
pub const MAX_SAMPLED_BRANCHES: usize = 15;

/// Branches returned when no window up to the lookback bound matches.
pub const FALLBACK_BRANCH_COUNT: usize = 10;

pub const INITIAL_WINDOW_DAYS: i64 = 30;
pub const WINDOW_STEP_DAYS: i64 = 30;
pub const MAX_LOOKBACK_DAYS: i64 = 365;

/// Result of evaluating one time window over already-fetched branches.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOutcome {
    /// Branches active within the window, in input order.
    Found(Vec<Branch>),
    /// Nothing matched; try a wider window.
    Widen,
}

/// Keeps branches with unknown commit info or a commit at or after `now - days_back`.
pub fn evaluate_window(branches: &[Branch], days_back: i64, now: DateTime<Utc>) -> WindowOutcome {
    let cutoff = now - Duration::days(days_back);
    let matching: Vec<Branch> = branches
        .iter()
        .filter(|b| match b.last_commit_date {
            None => true,
            Some(date) => date >= cutoff,
        })
        .cloned()
        .collect();

    if matching.is_empty() {
        WindowOutcome::Widen
    } else {
        WindowOutcome::Found(matching)
    }
}

/// Runs the widening search over sampled branches.
///
/// Returns `None` when no window up to [`MAX_LOOKBACK_DAYS`] matches.
pub fn search_windows(sampled: &[Branch], now: DateTime<Utc>) -> Option<Vec<Branch>> {
    let mut days_back = INITIAL_WINDOW_DAYS;
    while days_back <= MAX_LOOKBACK_DAYS {
        match evaluate_window(sampled, days_back, now) {
            WindowOutcome::Found(branches) => return Some(branches),
            WindowOutcome::Widen => {
                debug!(days_back, "no branches in window, widening");
                days_back += WINDOW_STEP_DAYS;
            }
        }
    }
    None
}

/// First [`FALLBACK_BRANCH_COUNT`] branches of the listing, commit info unknown.
pub fn fallback_branches(all: &[BranchSummary]) -> Vec<Branch> {
    all.iter()
        .take(FALLBACK_BRANCH_COUNT)
        .map(Branch::unknown)
        .collect()
}

/// Looks up each branch's head commit concurrently. A failed lookup yields a
/// branch with unknown commit info; results keep the input order.
pub async fn fetch_commit_info<A>(api: &A, repo: &str, branches: &[BranchSummary]) -> Vec<Branch>
where
    A: GitHubApiTrait + ?Sized,
{
    join_all(branches.iter().map(|summary| async move {
        match api.get_commit(repo, &summary.commit.sha).await {
            Ok(detail) => Branch {
                name: summary.name.clone(),
                head_sha: summary.commit.sha.clone(),
                last_commit_date: detail.commit.committer.map(|c| c.date),
                last_commit_message: Some(detail.commit.message),
            },
            Err(e) => {
                debug!(branch = %summary.name, error = %e, "commit lookup failed");
                Branch::unknown(summary)
            }
        }
    }))
    .await
}

/// Branches of `repo` with recent activity, most recently committed first.
pub async fn find_recent_branches<A>(
    api: &A,
    repo: &str,
    branches: &[BranchSummary],
    now: DateTime<Utc>,
) -> Vec<Branch>
where
    A: GitHubApiTrait + ?Sized,
{
    if branches.is_empty() {
        return Vec::new();
    }

    let sample = &branches[..branches.len().min(MAX_SAMPLED_BRANCHES)];
    let sampled = fetch_commit_info(api, repo, sample).await;

    match search_windows(&sampled, now) {
        Some(mut recent) => {
            sort_recent_first(&mut recent, |b| b.last_commit_date.as_ref());
            recent
        }
        None => {
            info!(repo, "no branch active within lookback, returning first branches");
            fallback_branches(branches)
        }
    }
}
