// src/services/catalog.rs

//! Book catalog client.
//!
//! Thin fetch wrapper over the external catalog: one request per call, no
//! retry, no caching. Callers decide how much failure they tolerate.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{AuthorRecord, CatalogConfig, SearchDoc, SearchResponse, WorkRecord};
use crate::utils::endpoint;
use crate::utils::http::create_catalog_client;

/// Fields requested from the search endpoint.
const SEARCH_FIELDS: &str = "key,title,author_name,cover_i";

/// Read access to the book catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch a work record by key (e.g. `/works/OL45883W`).
    async fn fetch_work(&self, key: &str) -> Result<WorkRecord>;

    /// Fetch an author record by key (e.g. `/authors/OL26320A`).
    async fn fetch_author(&self, key: &str) -> Result<AuthorRecord>;

    /// Search works tagged with `subject`, returning at most `limit` hits.
    async fn search(&self, subject: &str, limit: usize) -> Result<Vec<SearchDoc>>;
}

/// Open Library implementation of [`CatalogClient`].
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
}

impl OpenLibraryClient {
    /// Create a client from configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Ok(Self::with_client(
            create_catalog_client(config)?,
            &config.base_url,
        ))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    fn record_url(&self, key: &str) -> Result<Url> {
        let key = key.trim().trim_end_matches(".json");
        if key.is_empty() {
            return Err(AppError::validation("Empty catalog key"));
        }
        endpoint(&self.base_url, &format!("{key}.json"))
    }

    fn search_url(&self, subject: &str, limit: usize) -> Result<Url> {
        let mut url = endpoint(&self.base_url, "search.json")?;
        url.query_pairs_mut()
            .append_pair("subject", subject)
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", SEARCH_FIELDS);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogClient for OpenLibraryClient {
    async fn fetch_work(&self, key: &str) -> Result<WorkRecord> {
        let url = self.record_url(key)?;
        self.get_json(url).await
    }

    async fn fetch_author(&self, key: &str) -> Result<AuthorRecord> {
        let url = self.record_url(key)?;
        self.get_json(url).await
    }

    async fn search(&self, subject: &str, limit: usize) -> Result<Vec<SearchDoc>> {
        let url = self.search_url(subject, limit)?;
        let response: SearchResponse = self.get_json(url).await?;
        log::debug!(
            "Subject \"{}\" matched {} works, kept {}",
            subject,
            response.num_found,
            response.docs.len()
        );
        Ok(response.docs)
    }
}
