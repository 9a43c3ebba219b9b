//! Navigation/History Controller for eztag.
//!
//! The current [`NavigationState`] is the source of truth. A history stack in
//! the style of a browser's is kept as a projection of it so back/forward can
//! restore the right screen and repository.

use tracing::debug;

use crate::types::navigation::{HistoryEffect, HistoryEntry, NavigationEvent, NavigationState};

/// Pure transition: next state plus the history side effect it requests.
pub fn transition(event: NavigationEvent) -> (NavigationState, HistoryEffect) {
    match event {
        NavigationEvent::Navigate {
            target,
            skip_history,
        } => {
            let effect = match (&target, skip_history) {
                (NavigationState::Auth, _) | (_, true) => HistoryEffect::None,
                _ => HistoryEffect::Push(HistoryEntry::for_state(target.clone())),
            };
            (target, effect)
        }
        NavigationEvent::Pop { state, has_session } => {
            let next = match state {
                Some(state) => state,
                None if has_session => NavigationState::RepoList,
                None => NavigationState::Auth,
            };
            (next, HistoryEffect::None)
        }
    }
}

/// Trait defining navigation operations.
pub trait NavigationManagerTrait {
    fn current(&self) -> &NavigationState;
    /// Moves to `target`, recording a history entry unless `skip_history`.
    fn navigate(&mut self, target: NavigationState, skip_history: bool);
    /// Steps back one entry. `None` when already at the oldest entry.
    fn back(&mut self, has_session: bool) -> Option<NavigationState>;
    /// Steps forward one entry. `None` when already at the newest entry.
    fn forward(&mut self, has_session: bool) -> Option<NavigationState>;
    fn history(&self) -> &[HistoryEntry];
    fn cursor(&self) -> usize;
}

/// In-memory navigation controller with a browser-like history stack.
pub struct NavigationManager {
    current: NavigationState,
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl NavigationManager {
    /// Starts on the sign-in screen with the stateless page-load entry.
    pub fn new() -> Self {
        Self {
            current: NavigationState::Auth,
            entries: vec![HistoryEntry::initial()],
            cursor: 0,
        }
    }

    fn apply(&mut self, event: NavigationEvent) {
        let (next, effect) = transition(event);
        if let HistoryEffect::Push(entry) = effect {
            self.entries.truncate(self.cursor + 1);
            self.entries.push(entry);
            self.cursor = self.entries.len() - 1;
        }
        debug!(fragment = %next.fragment(), "navigated");
        self.current = next;
    }

    fn pop_to(&mut self, index: usize, has_session: bool) -> NavigationState {
        self.cursor = index;
        let state = self.entries[index].state.clone();
        self.apply(NavigationEvent::Pop { state, has_session });
        self.current.clone()
    }
}

impl Default for NavigationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationManagerTrait for NavigationManager {
    fn current(&self) -> &NavigationState {
        &self.current
    }

    fn navigate(&mut self, target: NavigationState, skip_history: bool) {
        self.apply(NavigationEvent::Navigate {
            target,
            skip_history,
        });
    }

    fn back(&mut self, has_session: bool) -> Option<NavigationState> {
        if self.cursor == 0 {
            return None;
        }
        Some(self.pop_to(self.cursor - 1, has_session))
    }

    fn forward(&mut self, has_session: bool) -> Option<NavigationState> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        Some(self.pop_to(self.cursor + 1, has_session))
    }

    fn history(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn cursor(&self) -> usize {
        self.cursor
    }
}
