use serde::{Deserialize, Serialize};

use super::github::Repository;

/// The logical screen currently shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "repo", rename_all = "snake_case")]
pub enum NavigationState {
    Auth,
    RepoList,
    RepoDetail(Repository),
}

impl NavigationState {
    /// URL fragment recorded in the history entry for this screen.
    pub fn fragment(&self) -> String {
        match self {
            NavigationState::Auth => String::new(),
            NavigationState::RepoList => "#repos".to_string(),
            NavigationState::RepoDetail(repo) => format!("#repo/{}", repo.full_name),
        }
    }

    pub fn repository(&self) -> Option<&Repository> {
        match self {
            NavigationState::RepoDetail(repo) => Some(repo),
            _ => None,
        }
    }
}

/// One entry of the history stack. The page-load entry carries no state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub state: Option<NavigationState>,
    pub fragment: String,
}

impl HistoryEntry {
    pub fn initial() -> Self {
        Self {
            state: None,
            fragment: String::new(),
        }
    }

    pub fn for_state(state: NavigationState) -> Self {
        Self {
            fragment: state.fragment(),
            state: Some(state),
        }
    }
}

/// Inputs to the navigation transition function.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// Explicit move to a screen. `skip_history` is set when replaying a pop.
    Navigate {
        target: NavigationState,
        skip_history: bool,
    },
    /// The history cursor moved onto an entry.
    Pop {
        state: Option<NavigationState>,
        has_session: bool,
    },
}

/// Side effect on the history stack requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEffect {
    None,
    Push(HistoryEntry),
}
