// src/services/sync.rs

//! Shelf and favorite status synchronizer.
//!
//! One synchronizer backs one control for one book. It keeps the displayed
//! value in local state, dispatches mutations to the backend, and writes the
//! shared session store only after the backend confirmed.
//!
//! ```text
//!            change()                 backend ok
//!  Set/Unset ────────► Pending ─────────────────► Set/Unset (+ store write)
//!      ▲                  │ backend error
//!      │ auth required    ├──────────────────────► Error { last confirmed }
//!      └──────────────────┘
//! ```
//!
//! Without a logged-in user a change never reaches the backend: the user is
//! warned and sent to the login view with a return path.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, error_message, is_auth_required};
use crate::models::{
    Config, FavoritesResponse, SessionUser, ShelfAction, ShelfResponse, ShelfStatus,
};
use crate::services::{BackendApi, NavigationState, Navigator, Notifier, Toast};
use crate::session::SessionStore;
use crate::utils::Liveness;

/// Prompt shown before leaving for the login view after an auth failure.
pub const LOGIN_PROMPT: &str = "Your session has expired. Log in again?";

/// Local state of one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState<V> {
    /// No value stored for this book
    Unset,
    /// A mutation is in flight; `previous` is the last confirmed value
    Pending { previous: Option<V> },
    /// Confirmed value
    Set(V),
    /// The last mutation failed; `last_confirmed` stays visible
    Error { last_confirmed: Option<V> },
}

impl<V: Clone> SyncState<V> {
    fn from_confirmed(value: Option<V>) -> Self {
        match value {
            Some(v) => SyncState::Set(v),
            None => SyncState::Unset,
        }
    }

    /// The last confirmed value, whatever the state.
    pub fn confirmed(&self) -> Option<V> {
        match self {
            SyncState::Unset => None,
            SyncState::Set(v) => Some(v.clone()),
            SyncState::Pending { previous } => previous.clone(),
            SyncState::Error { last_confirmed } => last_confirmed.clone(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SyncState::Pending { .. })
    }
}

/// What a call to [`StatusSynchronizer::change`] ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome<V> {
    /// The backend stored this value (`None` = cleared)
    Confirmed(Option<V>),
    /// The user was sent towards the login view; `navigated` is false when
    /// the prompt was declined or the control unmounted during the delay
    LoginRequired { navigated: bool },
    /// The backend rejected the change; carries the display message
    Failed(String),
    /// Another mutation is still in flight
    Busy,
    /// The control unmounted before the result arrived
    Discarded,
}

/// One kind of per-book status (shelf placement, favorite flag).
#[async_trait]
pub trait StatusKind: Send + Sync + 'static {
    /// Displayed value
    type Value: Clone + PartialEq + fmt::Debug + Send + Sync;
    /// User action
    type Action: Copy + fmt::Debug + Send + Sync;
    /// Backend confirmation
    type Receipt: Send;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Current value in the session user's collections.
    fn read(&self, user: &SessionUser, book_key: &str) -> Option<Self::Value>;

    /// Send the mutation to the backend.
    async fn dispatch(
        &self,
        backend: &dyn BackendApi,
        book_key: &str,
        action: Self::Action,
    ) -> Result<Self::Receipt>;

    /// Value the backend confirmed.
    fn resolve(&self, receipt: &Self::Receipt, book_key: &str) -> Option<Self::Value>;

    /// Write the confirmation into the session user.
    fn apply(&self, user: &mut SessionUser, book_key: &str, receipt: Self::Receipt);

    fn success_message(&self, confirmed: Option<&Self::Value>) -> String;

    fn login_message(&self) -> &'static str;

    fn retry_message(&self) -> &'static str;
}

/// Shelf placement of a book.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfKind;

#[async_trait]
impl StatusKind for ShelfKind {
    type Value = ShelfStatus;
    type Action = ShelfAction;
    type Receipt = ShelfResponse;

    fn name(&self) -> &'static str {
        "shelf"
    }

    fn read(&self, user: &SessionUser, book_key: &str) -> Option<ShelfStatus> {
        user.shelf_status(book_key)
    }

    async fn dispatch(
        &self,
        backend: &dyn BackendApi,
        book_key: &str,
        action: ShelfAction,
    ) -> Result<ShelfResponse> {
        backend.set_shelf_status(book_key, action.requested()).await
    }

    fn resolve(&self, receipt: &ShelfResponse, _book_key: &str) -> Option<ShelfStatus> {
        receipt.status.and_then(ShelfStatus::stored)
    }

    fn apply(&self, user: &mut SessionUser, book_key: &str, receipt: ShelfResponse) {
        user.set_shelf_status(book_key, receipt.status);
    }

    fn success_message(&self, confirmed: Option<&ShelfStatus>) -> String {
        match confirmed {
            Some(ShelfStatus::WantToRead) => "Added to your Want to Read shelf".into(),
            Some(ShelfStatus::Ongoing) => "Marked as currently reading".into(),
            Some(ShelfStatus::Completed) => "Marked as completed".into(),
            Some(ShelfStatus::None) | None => "Removed from your shelf".into(),
        }
    }

    fn login_message(&self) -> &'static str {
        "Please log in to add books to your shelf."
    }

    fn retry_message(&self) -> &'static str {
        "Failed to update shelf. Please try again."
    }
}

/// Favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Toggle,
}

/// Favorite flag of a book; `Set(true)` when favorited, `Unset` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct FavoriteKind;

#[async_trait]
impl StatusKind for FavoriteKind {
    type Value = bool;
    type Action = FavoriteAction;
    type Receipt = FavoritesResponse;

    fn name(&self) -> &'static str {
        "favorite"
    }

    fn read(&self, user: &SessionUser, book_key: &str) -> Option<bool> {
        user.is_favorite(book_key).then_some(true)
    }

    async fn dispatch(
        &self,
        backend: &dyn BackendApi,
        book_key: &str,
        _action: FavoriteAction,
    ) -> Result<FavoritesResponse> {
        backend.update_favorites(book_key).await
    }

    fn resolve(&self, receipt: &FavoritesResponse, book_key: &str) -> Option<bool> {
        receipt
            .favorites
            .iter()
            .any(|k| k == book_key)
            .then_some(true)
    }

    fn apply(&self, user: &mut SessionUser, _book_key: &str, receipt: FavoritesResponse) {
        user.favorites = receipt.favorites;
    }

    fn success_message(&self, confirmed: Option<&bool>) -> String {
        match confirmed {
            Some(true) => "Added to favorites".into(),
            _ => "Removed from favorites".into(),
        }
    }

    fn login_message(&self) -> &'static str {
        "Please log in to add books to your favorites."
    }

    fn retry_message(&self) -> &'static str {
        "Failed to update favorites. Please try again."
    }
}

/// Collaborators shared by every synchronizer of a session.
#[derive(Clone)]
pub struct SyncContext {
    pub config: Arc<Config>,
    pub store: SessionStore,
    pub backend: Arc<dyn BackendApi>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

/// Synchronizer for one status kind of one book.
pub struct StatusSynchronizer<K: StatusKind> {
    kind: K,
    ctx: SyncContext,
    book_key: String,
    return_path: String,
    state: Mutex<SyncState<K::Value>>,
    liveness: Liveness,
}

/// Shelf control synchronizer.
pub type ShelfSynchronizer = StatusSynchronizer<ShelfKind>;

/// Favorite control synchronizer.
pub type FavoriteSynchronizer = StatusSynchronizer<FavoriteKind>;

impl<K: StatusKind> StatusSynchronizer<K> {
    /// Mount a control for `book_key`, reading the current value from the
    /// session store. `return_path` is where login sends the user back to.
    pub fn mount(kind: K, ctx: SyncContext, book_key: &str, return_path: &str) -> Self {
        let initial = ctx
            .store
            .read(|s| s.user.as_ref().and_then(|u| kind.read(u, book_key)));
        Self {
            kind,
            ctx,
            book_key: book_key.to_string(),
            return_path: return_path.to_string(),
            state: Mutex::new(SyncState::from_confirmed(initial)),
            liveness: Liveness::new(),
        }
    }

    pub fn book_key(&self) -> &str {
        &self.book_key
    }

    pub fn state(&self) -> SyncState<K::Value> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_state(&self, next: SyncState<K::Value>) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Move to `Pending` unless a mutation is already in flight. Returns the
    /// last confirmed value on success.
    fn begin(&self) -> std::result::Result<Option<K::Value>, ()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_pending() {
            return Err(());
        }
        let previous = state.confirmed();
        *state = SyncState::Pending {
            previous: previous.clone(),
        };
        Ok(previous)
    }

    /// Mark the control unmounted; late results are discarded.
    pub fn unmount(&self) {
        self.liveness.kill();
    }

    pub fn is_mounted(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Re-read the session store. Ignored while a mutation is in flight.
    pub fn refresh(&self) {
        let current = self
            .ctx
            .store
            .read(|s| s.user.as_ref().and_then(|u| self.kind.read(u, &self.book_key)));
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.is_pending() {
            *state = SyncState::from_confirmed(current);
        }
    }

    /// Refresh on every session store change until unmounted.
    pub async fn follow_store(&self) {
        let mut rx = self.ctx.store.subscribe();
        while rx.changed().await.is_ok() {
            if !self.is_mounted() {
                break;
            }
            self.refresh();
        }
    }

    /// Apply a user action.
    pub async fn change(&self, action: K::Action) -> SyncOutcome<K::Value> {
        if self.state().is_pending() {
            log::warn!(
                "Ignoring {} change for {} while another is in flight",
                self.kind.name(),
                self.book_key
            );
            return SyncOutcome::Busy;
        }

        if !self.ctx.store.is_authenticated() {
            log::info!(
                "{} change for {} needs a login",
                self.kind.name(),
                self.book_key
            );
            let navigated = self.redirect_to_login(false).await;
            return SyncOutcome::LoginRequired { navigated };
        }

        let Ok(previous) = self.begin() else {
            return SyncOutcome::Busy;
        };
        log::debug!(
            "Dispatching {} {:?} for {}",
            self.kind.name(),
            action,
            self.book_key
        );

        match self
            .kind
            .dispatch(self.ctx.backend.as_ref(), &self.book_key, action)
            .await
        {
            Ok(receipt) => self.confirm(receipt),
            Err(err) if is_auth_required(&err) => {
                if !self.is_mounted() {
                    return SyncOutcome::Discarded;
                }
                self.set_state(SyncState::from_confirmed(previous));
                let navigated = self.redirect_to_login(true).await;
                SyncOutcome::LoginRequired { navigated }
            }
            Err(err) => {
                let message = error_message(&err);
                let level = if err.is_network() {
                    log::Level::Warn
                } else {
                    log::Level::Error
                };
                log::log!(
                    level,
                    "Failed to update {} for {}: {}",
                    self.kind.name(),
                    self.book_key,
                    message
                );
                if !self.is_mounted() {
                    return SyncOutcome::Discarded;
                }
                self.set_state(SyncState::Error {
                    last_confirmed: previous,
                });
                self.ctx.notifier.notify(Toast::error(self.kind.retry_message()));
                SyncOutcome::Failed(message)
            }
        }
    }

    fn confirm(&self, receipt: K::Receipt) -> SyncOutcome<K::Value> {
        let resolved = self.kind.resolve(&receipt, &self.book_key);

        // the backend already changed, so the shared store follows even if
        // this control is gone
        let stored = self
            .ctx
            .store
            .update_user(|user| self.kind.apply(user, &self.book_key, receipt));
        if !stored {
            log::warn!(
                "Session ended before {} update for {} was confirmed",
                self.kind.name(),
                self.book_key
            );
        }

        if !self.is_mounted() {
            return SyncOutcome::Discarded;
        }
        self.set_state(SyncState::from_confirmed(resolved.clone()));
        self.ctx
            .notifier
            .notify(Toast::success(self.kind.success_message(resolved.as_ref())));
        SyncOutcome::Confirmed(resolved)
    }

    /// Warn, wait the redirect delay, optionally confirm, then navigate to the
    /// login view. Returns whether navigation happened.
    async fn redirect_to_login(&self, ask_first: bool) -> bool {
        self.ctx
            .notifier
            .notify(Toast::warning(self.kind.login_message()));

        tokio::time::sleep(Duration::from_millis(self.ctx.config.sync.redirect_delay_ms)).await;
        if !self.is_mounted() {
            return false;
        }

        if ask_first && !self.ctx.notifier.confirm(LOGIN_PROMPT).await {
            log::info!("Login prompt declined");
            return false;
        }

        self.ctx.navigator.navigate(
            &self.ctx.config.sync.login_path,
            NavigationState {
                from: self.return_path.clone(),
            },
        );
        true
    }
}
