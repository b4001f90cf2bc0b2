//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// External book catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Internal backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Limits for detail, similar-books and activity enrichment
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Shelf/favorite synchronizer behavior
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.user_agent.trim().is_empty() {
            return Err(AppError::validation("catalog.user_agent is empty"));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(AppError::validation("catalog.timeout_secs must be > 0"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(AppError::validation("backend.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.catalog.base_url)?;
        url::Url::parse(&self.catalog.covers_url)?;
        url::Url::parse(&self.backend.base_url)?;
        if self.enrichment.activity_limit == 0 {
            return Err(AppError::validation(
                "enrichment.activity_limit must be > 0",
            ));
        }
        if self.enrichment.similar_per_subject == 0 || self.enrichment.similar_max_results == 0 {
            return Err(AppError::validation(
                "enrichment similar-book limits must be > 0",
            ));
        }
        if !self.sync.login_path.starts_with('/') {
            return Err(AppError::validation("sync.login_path must start with '/'"));
        }
        Ok(())
    }
}

/// Catalog HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL for work, author and search endpoints
    #[serde(default = "defaults::catalog_url")]
    pub base_url: String,

    /// Base URL of the cover image service
    #[serde(default = "defaults::covers_url")]
    pub covers_url: String,

    /// User-Agent header for catalog requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::catalog_timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::catalog_url(),
            covers_url: defaults::covers_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::catalog_timeout(),
        }
    }
}

impl CatalogConfig {
    /// Cover image URL for a numeric cover id, if it names a real cover.
    pub fn cover_url(&self, cover_id: i64, size: CoverSize) -> Option<String> {
        (cover_id > 0).then(|| {
            format!(
                "{}/b/id/{}-{}.jpg",
                self.covers_url.trim_end_matches('/'),
                cover_id,
                size.suffix()
            )
        })
    }
}

/// Cover image size variants served by the cover service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Backend HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST backend
    #[serde(default = "defaults::backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::backend_timeout")]
    pub timeout_secs: u64,

    /// Bearer token of the logged-in user
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::backend_url(),
            timeout_secs: defaults::backend_timeout(),
            token: None,
        }
    }
}

/// Enrichment limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Number of most recent activities to enrich
    #[serde(default = "defaults::activity_limit")]
    pub activity_limit: usize,

    /// Number of subjects queried for similar books
    #[serde(default = "defaults::similar_subject_limit")]
    pub similar_subject_limit: usize,

    /// Records requested per subject (desired + buffer)
    #[serde(default = "defaults::similar_per_subject")]
    pub similar_per_subject: usize,

    /// Maximum candidates returned
    #[serde(default = "defaults::similar_max_results")]
    pub similar_max_results: usize,

    /// Maximum genre tags kept on a book
    #[serde(default = "defaults::genre_limit")]
    pub genre_limit: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            activity_limit: defaults::activity_limit(),
            similar_subject_limit: defaults::similar_subject_limit(),
            similar_per_subject: defaults::similar_per_subject(),
            similar_max_results: defaults::similar_max_results(),
            genre_limit: defaults::genre_limit(),
        }
    }
}

/// Synchronizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Path of the login view
    #[serde(default = "defaults::login_path")]
    pub login_path: String,

    /// Delay between the login warning and the redirect, in milliseconds
    #[serde(default = "defaults::redirect_delay")]
    pub redirect_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            login_path: defaults::login_path(),
            redirect_delay_ms: defaults::redirect_delay(),
        }
    }
}

mod defaults {
    // Catalog defaults
    pub fn catalog_url() -> String {
        "https://openlibrary.org".into()
    }
    pub fn covers_url() -> String {
        "https://covers.openlibrary.org".into()
    }
    pub fn user_agent() -> String {
        "shelfmate/0.1 (book-tracking client)".into()
    }
    pub fn catalog_timeout() -> u64 {
        15
    }

    // Backend defaults
    pub fn backend_url() -> String {
        "http://localhost:3000/api".into()
    }
    pub fn backend_timeout() -> u64 {
        10
    }

    // Enrichment defaults
    pub fn activity_limit() -> usize {
        3
    }
    pub fn similar_subject_limit() -> usize {
        3
    }
    pub fn similar_per_subject() -> usize {
        7
    }
    pub fn similar_max_results() -> usize {
        20
    }
    pub fn genre_limit() -> usize {
        5
    }

    // Sync defaults
    pub fn login_path() -> String {
        "/login".into()
    }
    pub fn redirect_delay() -> u64 {
        1500
    }
}
