//! Navigation controller and its pure transition function.

use chrono::{TimeZone, Utc};
use eztag::managers::navigation_manager::{transition, NavigationManager, NavigationManagerTrait};
use eztag::types::github::Repository;
use eztag::types::navigation::{HistoryEffect, HistoryEntry, NavigationEvent, NavigationState};
use rstest::rstest;

fn repo(full_name: &str) -> Repository {
    Repository {
        full_name: full_name.to_string(),
        name: full_name.rsplit('/').next().unwrap().to_string(),
        description: None,
        language: None,
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        html_url: format!("https://github.com/{}", full_name),
        archived: false,
    }
}

fn detail(full_name: &str) -> NavigationState {
    NavigationState::RepoDetail(repo(full_name))
}

#[test]
fn test_fragments() {
    assert_eq!(NavigationState::Auth.fragment(), "");
    assert_eq!(NavigationState::RepoList.fragment(), "#repos");
    assert_eq!(detail("octo/app").fragment(), "#repo/octo/app");
}

#[rstest]
#[case(NavigationState::RepoList, false, true)]
#[case(NavigationState::RepoList, true, false)]
#[case(NavigationState::Auth, false, false)]
fn test_navigate_history_effect(
    #[case] target: NavigationState,
    #[case] skip_history: bool,
    #[case] pushes: bool,
) {
    let (next, effect) = transition(NavigationEvent::Navigate {
        target: target.clone(),
        skip_history,
    });
    assert_eq!(next, target);
    match effect {
        HistoryEffect::Push(entry) => {
            assert!(pushes);
            assert_eq!(entry, HistoryEntry::for_state(target));
        }
        HistoryEffect::None => assert!(!pushes),
    }
}

#[rstest]
#[case(true, NavigationState::RepoList)]
#[case(false, NavigationState::Auth)]
fn test_stateless_pop_falls_back(#[case] has_session: bool, #[case] expected: NavigationState) {
    let (next, effect) = transition(NavigationEvent::Pop {
        state: None,
        has_session,
    });
    assert_eq!(next, expected);
    assert_eq!(effect, HistoryEffect::None);
}

#[test]
fn test_pop_restores_recorded_state() {
    let (next, _) = transition(NavigationEvent::Pop {
        state: Some(detail("octo/app")),
        has_session: false,
    });
    assert_eq!(next, detail("octo/app"));
}

#[test]
fn test_starts_on_auth_with_initial_entry() {
    let nav = NavigationManager::new();
    assert_eq!(nav.current(), &NavigationState::Auth);
    assert_eq!(nav.history(), &[HistoryEntry::initial()]);
    assert_eq!(nav.cursor(), 0);
}

/// list → detail, back restores the list, forward restores the detail.
#[test]
fn test_back_and_forward() {
    let mut nav = NavigationManager::new();
    nav.navigate(NavigationState::RepoList, false);
    nav.navigate(detail("octo/app"), false);

    assert_eq!(nav.back(true), Some(NavigationState::RepoList));
    assert_eq!(nav.current(), &NavigationState::RepoList);
    assert_eq!(nav.forward(true), Some(detail("octo/app")));
    assert_eq!(nav.forward(true), None);
}

/// Going back to the page-load entry lands on the list when signed in,
/// otherwise on the sign-in screen.
#[test]
fn test_back_to_initial_entry() {
    let mut nav = NavigationManager::new();
    nav.navigate(NavigationState::RepoList, false);
    assert_eq!(nav.back(true), Some(NavigationState::RepoList));
    assert_eq!(nav.back(true), None);

    let mut nav = NavigationManager::new();
    nav.navigate(NavigationState::RepoList, false);
    assert_eq!(nav.back(false), Some(NavigationState::Auth));
}

#[test]
fn test_skip_history_replaces_screen_without_entry() {
    let mut nav = NavigationManager::new();
    nav.navigate(detail("octo/app"), false);
    nav.navigate(detail("octo/app"), true);
    nav.navigate(NavigationState::Auth, false);

    assert_eq!(nav.history().len(), 2);
    assert_eq!(nav.current(), &NavigationState::Auth);
}

/// A new navigation after going back discards the forward entries.
#[test]
fn test_navigate_truncates_forward_history() {
    let mut nav = NavigationManager::new();
    nav.navigate(NavigationState::RepoList, false);
    nav.navigate(detail("octo/a"), false);
    nav.back(true);
    nav.navigate(detail("octo/b"), false);

    assert_eq!(nav.history().len(), 3);
    assert_eq!(nav.history()[2].fragment, "#repo/octo/b");
    assert_eq!(nav.forward(true), None);
}
