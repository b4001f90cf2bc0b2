//! Process-wide session state.
//!
//! The session is populated at login and cleared at logout. Read paths take
//! snapshots; the only writers besides login/logout are the status
//! synchronizers after the backend confirmed a mutation.
//!
//! ```text
//! login ──► SessionStore ──► subscribers re-read on change
//!              ▲
//!              └── StatusSynchronizer (confirmed writes only)
//! ```

mod store;

use serde::{Deserialize, Serialize};

use crate::models::{ActivityEvent, SessionUser};

pub use store::SessionStore;

/// Snapshot of everything the session holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Authenticated user, `None` when logged out
    pub user: Option<SessionUser>,

    /// Raw activity events loaded for the feed
    pub activities: Vec<ActivityEvent>,

    /// Incremented on every change
    pub version: u64,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
