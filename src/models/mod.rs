// src/models/mod.rs

//! Domain models for the client core.
//!
//! Raw catalog records, backend entities, and the view models the services
//! build from them.

mod activity;
mod book;
mod catalog;
mod config;
mod shelf;
mod user;

// Re-export all public types
pub use activity::{time_ago, ActivityAction, ActivityEvent, EnrichedActivity, Rating};
pub use book::{BookSummary, SimilarBookCandidate, NO_DESCRIPTION, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
pub use catalog::{
    AuthorRecord, AuthorRole, Description, KeyRef, SearchDoc, SearchResponse, WorkRecord,
};
pub use config::{
    BackendConfig, CatalogConfig, Config, CoverSize, EnrichmentConfig, SyncConfig,
};
pub use shelf::{ShelfAction, ShelfStatus};
pub use user::{SessionUser, UserProfile, UNKNOWN_USER, UNKNOWN_USERNAME};

/// Response of the favorites toggle endpoint.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct FavoritesResponse {
    /// The user's favorite book keys after the toggle
    #[serde(default)]
    pub favorites: Vec<String>,
}

/// Response of the shelf status endpoint.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ShelfResponse {
    /// Stored status; `null` when the book was taken off the shelf
    #[serde(default)]
    pub status: Option<ShelfStatus>,
}
