//! Per-user bounded conversation windows.
//!
//! The store is the only mutable state shared between reply workers. Appends
//! and snapshots go through one internal lock, so concurrent appends for the
//! same user serialize in some order and a snapshot never observes a
//! half-applied append.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use sugarlady_core::message::{Role, Turn};

/// Window capacity per user: 3 exchanges (user + assistant each).
pub const MAX_TURNS: usize = 6;

/// Concurrent map from user identity to a bounded conversation window.
///
/// Cheap to clone; all clones share the same state. Windows are created
/// lazily on first append and live for the rest of the process.
#[derive(Clone, Default)]
pub struct ConversationStore {
    inner: Arc<Mutex<HashMap<String, VecDeque<Turn>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the user's window, evicting the oldest turn when the
    /// window is at capacity.
    pub fn append(&self, user_id: &str, role: Role, text: impl Into<String>) {
        let mut windows = self.lock();
        let window = windows.entry(user_id.to_string()).or_default();
        if window.len() >= MAX_TURNS {
            window.pop_front();
        }
        window.push_back(Turn::new(role, text));
    }

    /// An ordered copy of the user's window; empty if the user is unknown.
    pub fn snapshot(&self, user_id: &str) -> Vec<Turn> {
        self.lock()
            .get(user_id)
            .map(|window| window.iter().cloned().collect())
            .unwrap_or_default()
    }

    // A poisoned lock still guards structurally sound windows; recover it
    // rather than dropping every user's history.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Turn>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
