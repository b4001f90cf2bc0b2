//! Session state container with change notifications.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{ActivityEvent, SessionUser};
use crate::session::SessionState;

/// Shared session store.
///
/// Cloning is cheap and every clone observes the same state. Subscribers get a
/// `watch` receiver that wakes on each change and always sees the latest
/// snapshot.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    /// Create an empty, logged-out store.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to future changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Run `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&*self.tx.borrow())
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.read(|state| state.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(SessionState::is_authenticated)
    }

    /// Apply a mutation and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.tx.send_modify(|state| {
            f(state);
            state.version += 1;
        });
    }

    /// Mutate the logged-in user. Returns false (and notifies nobody) when
    /// there is no user.
    pub fn update_user(&self, f: impl FnOnce(&mut SessionUser)) -> bool {
        self.tx.send_if_modified(|state| {
            let Some(user) = state.user.as_mut() else {
                return false;
            };
            f(user);
            state.version += 1;
            true
        })
    }

    /// Start a session for `user`, replacing any previous one.
    pub fn login(&self, user: SessionUser) {
        log::info!("Session started for {}", user.username);
        self.update(|state| {
            state.user = Some(user);
            state.activities.clear();
        });
    }

    /// End the session and drop everything it held.
    pub fn logout(&self) {
        log::info!("Session cleared");
        self.update(|state| {
            state.user = None;
            state.activities.clear();
        });
    }

    /// Replace the loaded activity events.
    pub fn set_activities(&self, activities: Vec<ActivityEvent>) {
        self.update(|state| state.activities = activities);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
