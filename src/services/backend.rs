// src/services/backend.rs

//! Internal backend client.
//!
//! Every non-success response is classified here, once: auth failures become
//! [`AppError::AuthRequired`], everything else an [`AppError::Backend`] with
//! a displayable message.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    ActivityEvent, BackendConfig, FavoritesResponse, SessionUser, ShelfResponse, ShelfStatus,
    UserProfile,
};
use crate::utils::endpoint;
use crate::utils::http::create_backend_client;

/// Backend calls used by the client core.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Toggle `book_key` in the current user's favorites.
    async fn update_favorites(&self, book_key: &str) -> Result<FavoritesResponse>;

    /// Set (or clear, with `None`) the current user's shelf status for a book.
    async fn set_shelf_status(
        &self,
        book_key: &str,
        status: Option<ShelfStatus>,
    ) -> Result<ShelfResponse>;

    /// The user the configured token belongs to.
    async fn fetch_current_user(&self) -> Result<SessionUser>;

    /// Public profile of any user.
    async fn fetch_user_profile(&self, user_id: &str) -> Result<UserProfile>;

    /// Activity events visible to the current user.
    async fn fetch_activities(&self) -> Result<Vec<ActivityEvent>>;
}

/// REST implementation of [`BackendApi`].
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend client from configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self::with_client(
            create_backend_client(config)?,
            &config.base_url,
        ))
    }

    /// Create a backend client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        endpoint(&self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::classify_failure(response).await);
        }
        Ok(response.json().await?)
    }

    /// Turn a non-success response into a typed error.
    async fn classify_failure(response: Response) -> AppError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        let error = AppError::backend(status, &body);
        log::debug!("Backend responded {}: {}", status, error);
        error
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn update_favorites(&self, book_key: &str) -> Result<FavoritesResponse> {
        let url = self.url("/users/favorites")?;
        self.send(self.client.post(url).json(&json!({ "bookKey": book_key })))
            .await
    }

    async fn set_shelf_status(
        &self,
        book_key: &str,
        status: Option<ShelfStatus>,
    ) -> Result<ShelfResponse> {
        let url = self.url("/users/shelf")?;
        self.send(
            self.client
                .put(url)
                .json(&json!({ "bookKey": book_key, "status": status })),
        )
        .await
    }

    async fn fetch_current_user(&self) -> Result<SessionUser> {
        let url = self.url("/users/me")?;
        self.send(self.client.get(url)).await
    }

    async fn fetch_user_profile(&self, user_id: &str) -> Result<UserProfile> {
        let mut url = self.url("/users")?;
        url.path_segments_mut()
            .map_err(|_| AppError::config("Backend base URL cannot have a path"))?
            .push(user_id);
        self.send(self.client.get(url)).await
    }

    async fn fetch_activities(&self) -> Result<Vec<ActivityEvent>> {
        let url = self.url("/activities")?;
        let raw: Vec<Value> = self.send(self.client.get(url)).await?;
        Ok(parse_activities(raw))
    }
}

/// Parse activity events one by one, skipping malformed entries.
pub fn parse_activities(raw: Vec<Value>) -> Vec<ActivityEvent> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let id = value.get("id").and_then(Value::as_str).map(str::to_owned);
            serde_json::from_value(value)
                .map_err(|e| {
                    log::warn!(
                        "Skipping activity {} ({}): {}",
                        index,
                        id.as_deref().unwrap_or("no id"),
                        e
                    );
                })
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_keep_api_prefix() {
        let backend = HttpBackend::new(&BackendConfig::default()).unwrap();
        assert_eq!(
            backend.url("/users/favorites").unwrap().as_str(),
            "http://localhost:3000/api/users/favorites"
        );
    }

    #[test]
    fn test_malformed_activities_are_skipped() {
        let valid = |id: &str| {
            json!({
                "id": id,
                "userId": "u1",
                "action": "addToShelf",
                "shelfStatus": "ongoing",
                "bookKey": "/works/OL1W",
                "occurredAt": "2026-03-01T12:00:00Z"
            })
        };
        let mut bad_rating = valid("a2");
        bad_rating["rating"] = json!(9);
        let mut bad_action = valid("a3");
        bad_action["action"] = json!("burnBook");

        let events = parse_activities(vec![valid("a1"), bad_rating, bad_action, json!("junk"), valid("a5")]);

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a5"]);
    }

    #[test]
    fn test_shelf_body_serializes_clear_as_null() {
        let body = json!({ "bookKey": "/works/OL1W", "status": Option::<ShelfStatus>::None });
        assert_eq!(body["status"], Value::Null);

        let body = json!({ "bookKey": "/works/OL1W", "status": Some(ShelfStatus::Ongoing) });
        assert_eq!(body["status"], "ongoing");
    }
}
