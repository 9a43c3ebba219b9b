//! Recent-branch discovery against the scripted API.

#[path = "../common/mod.rs"]
mod common;

use common::{branch_summary, commit, days_ago, now, MockGitHubApi};
use eztag::services::branch_finder::{
    evaluate_window, fallback_branches, find_recent_branches, search_windows, WindowOutcome,
    FALLBACK_BRANCH_COUNT, MAX_SAMPLED_BRANCHES,
};
use eztag::types::github::{Branch, BranchSummary};

fn branches(n: usize) -> Vec<BranchSummary> {
    (0..n)
        .map(|i| branch_summary(&format!("b{}", i), &format!("sha{}", i)))
        .collect()
}

fn dated(name: &str, days: i64) -> Branch {
    Branch {
        name: name.to_string(),
        head_sha: format!("{}-sha", name),
        last_commit_date: Some(days_ago(days)),
        last_commit_message: Some("msg".to_string()),
    }
}

/// Only the branch inside the first 30-day window is returned.
#[tokio::test]
async fn test_first_window_filters_old_branches() {
    let api = MockGitHubApi::new()
        .with_commit(commit("sha-a", days_ago(5), "fresh"))
        .with_commit(commit("sha-b", days_ago(40), "older"));
    let listing = vec![branch_summary("a", "sha-a"), branch_summary("b", "sha-b")];

    let found = find_recent_branches(&api, "octo/app", &listing, now()).await;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "a");
    assert_eq!(found[0].last_commit_message.as_deref(), Some("fresh"));
    assert_eq!(api.count("get_commit"), 2);
}

/// Widening reuses the sampled data; no extra requests are made.
#[tokio::test]
async fn test_widening_does_not_refetch() {
    let api = MockGitHubApi::new()
        .with_commit(commit("sha-a", days_ago(100), "a"))
        .with_commit(commit("sha-b", days_ago(110), "b"));
    let listing = vec![branch_summary("a", "sha-a"), branch_summary("b", "sha-b")];

    let found = find_recent_branches(&api, "octo/app", &listing, now()).await;

    let names: Vec<&str> = found.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(api.count("get_commit"), 2);
}

#[tokio::test]
async fn test_results_are_most_recent_first() {
    let api = MockGitHubApi::new()
        .with_commit(commit("s1", days_ago(20), "x"))
        .with_commit(commit("s2", days_ago(2), "y"))
        .with_commit(commit("s3", days_ago(10), "z"));
    let listing = vec![
        branch_summary("old", "s1"),
        branch_summary("newest", "s2"),
        branch_summary("mid", "s3"),
    ];

    let found = find_recent_branches(&api, "octo/app", &listing, now()).await;

    let names: Vec<&str> = found.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["newest", "mid", "old"]);
}

/// Only the first 15 branches get a commit lookup.
#[tokio::test]
async fn test_sampling_is_capped() {
    let mut api = MockGitHubApi::new();
    for i in 0..20 {
        api = api.with_commit(commit(&format!("sha{}", i), days_ago(1), "recent"));
    }
    let listing = branches(20);

    let found = find_recent_branches(&api, "octo/app", &listing, now()).await;

    assert_eq!(api.count("get_commit"), MAX_SAMPLED_BRANCHES);
    assert_eq!(found.len(), MAX_SAMPLED_BRANCHES);
    assert!(found.iter().all(|b| b.name != "b15"));
}

/// Nothing within a year: the first 10 branches of the listing come back
/// with unknown commit info.
#[tokio::test]
async fn test_fallback_after_max_lookback() {
    let mut api = MockGitHubApi::new();
    for i in 0..12 {
        api = api.with_commit(commit(&format!("sha{}", i), days_ago(400), "ancient"));
    }
    let listing = branches(12);

    let found = find_recent_branches(&api, "octo/app", &listing, now()).await;

    assert_eq!(found.len(), FALLBACK_BRANCH_COUNT);
    let names: Vec<String> = found.iter().map(|b| b.name.clone()).collect();
    let expected: Vec<String> = (0..10).map(|i| format!("b{}", i)).collect();
    assert_eq!(names, expected);
    assert!(found.iter().all(|b| !b.has_commit_info() && b.last_commit_message.is_none()));
}

/// A failed lookup yields an unknown branch, which every window keeps.
#[tokio::test]
async fn test_failed_lookup_is_kept_as_unknown() {
    let api = MockGitHubApi::new().with_commit(commit("sha-old", days_ago(400), "old"));
    let listing = vec![branch_summary("old", "sha-old"), branch_summary("broken", "missing")];

    let found = find_recent_branches(&api, "octo/app", &listing, now()).await;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "broken");
    assert!(!found[0].has_commit_info());
}

#[tokio::test]
async fn test_empty_listing_makes_no_calls() {
    let api = MockGitHubApi::new();
    let found = find_recent_branches(&api, "octo/app", &[], now()).await;
    assert!(found.is_empty());
    assert!(api.calls().is_empty());
}

#[test]
fn test_window_boundary_is_inclusive() {
    let exactly = dated("edge", 30);
    assert_eq!(
        evaluate_window(std::slice::from_ref(&exactly), 30, now()),
        WindowOutcome::Found(vec![exactly.clone()])
    );
    assert_eq!(evaluate_window(&[dated("late", 31)], 30, now()), WindowOutcome::Widen);
}

#[test]
fn test_search_windows_stops_at_lookback() {
    assert!(search_windows(&[dated("x", 360)], now()).is_some());
    assert!(search_windows(&[dated("x", 366)], now()).is_none());
    assert!(search_windows(&[], now()).is_none());
}

#[test]
fn test_fallback_branches_take_first_ten() {
    let fallback = fallback_branches(&branches(3));
    assert_eq!(fallback.len(), 3);
    assert_eq!(fallback_branches(&branches(25)).len(), FALLBACK_BRANCH_COUNT);
    assert_eq!(fallback[0].head_sha, "sha0");
}
