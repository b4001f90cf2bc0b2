//! In-memory fakes shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{
    ActivityEvent, AuthorRecord, FavoritesResponse, SearchDoc, SessionUser, ShelfResponse,
    ShelfStatus, UserProfile, WorkRecord,
};
use crate::services::{BackendApi, CatalogClient, NavigationState, Navigator, Notifier, Toast};

fn not_found(what: &str) -> AppError {
    AppError::Status {
        status: 404,
        url: format!("fake://{what}"),
    }
}

/// Catalog backed by maps; unknown keys fail with a 404.
#[derive(Default)]
pub struct FakeCatalog {
    pub works: HashMap<String, WorkRecord>,
    pub authors: HashMap<String, AuthorRecord>,
    pub searches: HashMap<String, Vec<SearchDoc>>,
    pub failing_subjects: HashSet<String>,
    /// Latency applied to every call
    pub delay: Duration,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_work(mut self, key: &str, work: WorkRecord) -> Self {
        self.works.insert(key.to_string(), work);
        self
    }

    pub fn with_author(mut self, key: &str, name: &str) -> Self {
        self.authors.insert(
            key.to_string(),
            AuthorRecord {
                name: Some(name.to_string()),
                personal_name: None,
            },
        );
        self
    }

    pub fn with_search(mut self, subject: &str, docs: Vec<SearchDoc>) -> Self {
        self.searches.insert(subject.to_string(), docs);
        self
    }

    pub fn failing_subject(mut self, subject: &str) -> Self {
        self.failing_subjects.insert(subject.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_work(&self, key: &str) -> Result<WorkRecord> {
        self.record(format!("work {key}")).await;
        self.works.get(key).cloned().ok_or_else(|| not_found(key))
    }

    async fn fetch_author(&self, key: &str) -> Result<AuthorRecord> {
        self.record(format!("author {key}")).await;
        self.authors.get(key).cloned().ok_or_else(|| not_found(key))
    }

    async fn search(&self, subject: &str, limit: usize) -> Result<Vec<SearchDoc>> {
        self.record(format!("search {subject} {limit}")).await;
        if self.failing_subjects.contains(subject) {
            return Err(AppError::Status {
                status: 503,
                url: format!("fake://search/{subject}"),
            });
        }
        let docs = self.searches.get(subject).cloned().unwrap_or_default();
        Ok(docs.into_iter().take(limit).collect())
    }
}

/// Search hit with a string key.
pub fn doc(key: &str, title: &str) -> SearchDoc {
    SearchDoc {
        key: Some(json!(key)),
        title: Some(title.to_string()),
        author_name: vec![format!("Author of {title}")],
        cover_i: None,
    }
}

/// How the fake backend answers mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendMode {
    #[default]
    Ok,
    AuthRequired,
    ServerError,
}

/// Backend holding one user's collections in memory.
#[derive(Default)]
pub struct FakeBackend {
    pub mode: Mutex<BackendMode>,
    pub favorites: Mutex<Vec<String>>,
    pub shelves: Mutex<HashMap<String, ShelfStatus>>,
    pub profiles: HashMap<String, UserProfile>,
    pub activities: Vec<ActivityEvent>,
    pub delay: Duration,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_mode(self, mode: BackendMode) -> Self {
        *self.mode.lock().unwrap() = mode;
        self
    }

    pub fn with_profile(mut self, id: &str, full_name: &str, username: &str) -> Self {
        self.profiles.insert(
            id.to_string(),
            UserProfile {
                id: id.to_string(),
                full_name: full_name.to_string(),
                username: username.to_string(),
                profile_pic: format!("https://img.example.com/{username}.png"),
            },
        );
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mode = *self.mode.lock().unwrap();
        match mode {
            BackendMode::Ok => Ok(()),
            BackendMode::AuthRequired => Err(AppError::backend(
                403,
                &json!({ "code": "AUTH_REQUIRED", "message": "Login required" }),
            )),
            BackendMode::ServerError => {
                Err(AppError::backend(500, &json!({ "message": "Database down" })))
            }
        }
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn update_favorites(&self, book_key: &str) -> Result<FavoritesResponse> {
        self.record(format!("favorites {book_key}")).await?;
        let mut favorites = self.favorites.lock().unwrap();
        if let Some(pos) = favorites.iter().position(|k| k == book_key) {
            favorites.remove(pos);
        } else {
            favorites.push(book_key.to_string());
        }
        Ok(FavoritesResponse {
            favorites: favorites.clone(),
        })
    }

    async fn set_shelf_status(
        &self,
        book_key: &str,
        status: Option<ShelfStatus>,
    ) -> Result<ShelfResponse> {
        let label = status.map_or("null".to_string(), |s| s.to_string());
        self.record(format!("shelf {book_key} {label}")).await?;
        let mut shelves = self.shelves.lock().unwrap();
        match status {
            Some(s) => {
                shelves.insert(book_key.to_string(), s);
            }
            None => {
                shelves.remove(book_key);
            }
        }
        Ok(ShelfResponse { status })
    }

    async fn fetch_current_user(&self) -> Result<SessionUser> {
        self.record("me".to_string()).await?;
        Ok(SessionUser {
            id: "u1".into(),
            username: "reader".into(),
            full_name: "Ada Reader".into(),
            favorites: self.favorites.lock().unwrap().clone(),
            shelves: self.shelves.lock().unwrap().clone(),
        })
    }

    async fn fetch_user_profile(&self, user_id: &str) -> Result<UserProfile> {
        self.calls.lock().unwrap().push(format!("profile {user_id}"));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| not_found(user_id))
    }

    async fn fetch_activities(&self) -> Result<Vec<ActivityEvent>> {
        self.record("activities".to_string()).await?;
        Ok(self.activities.clone())
    }
}

/// Notifier that records toasts and answers prompts with a fixed reply.
pub struct RecordingNotifier {
    pub toasts: Mutex<Vec<Toast>>,
    pub prompts: Mutex<Vec<String>>,
    pub confirm_reply: bool,
}

impl RecordingNotifier {
    pub fn new(confirm_reply: bool) -> Self {
        Self {
            toasts: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            confirm_reply,
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }

    async fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.confirm_reply
    }
}

/// Navigator that records each navigation with the (tokio) time it happened.
#[derive(Default)]
pub struct RecordingNavigator {
    pub visits: Mutex<Vec<(String, NavigationState, tokio::time::Instant)>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<(String, NavigationState, tokio::time::Instant)> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str, state: NavigationState) {
        self.visits
            .lock()
            .unwrap()
            .push((path.to_string(), state, tokio::time::Instant::now()));
    }
}
