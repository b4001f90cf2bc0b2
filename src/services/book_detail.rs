// src/services/book_detail.rs

//! Book detail resolver.
//!
//! Builds a [`BookSummary`] from a work record, resolving author references
//! concurrently. Only the work fetch itself is fatal; author lookups degrade
//! to a placeholder.

use std::sync::Arc;

use futures::future;

use crate::error::{AppError, Result};
use crate::models::{
    BookSummary, Config, CoverSize, Description, NO_DESCRIPTION, UNKNOWN_AUTHOR, UNKNOWN_TITLE,
    WorkRecord,
};
use crate::services::CatalogClient;

/// Resolves normalized book details from the catalog.
pub struct BookDetailResolver {
    config: Arc<Config>,
    catalog: Arc<dyn CatalogClient>,
}

impl BookDetailResolver {
    pub fn new(config: Arc<Config>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self { config, catalog }
    }

    /// Resolve the work behind `key` into a book summary.
    ///
    /// Fails with [`AppError::DetailFetch`] only when the work record itself
    /// cannot be fetched.
    pub async fn resolve(&self, key: &str) -> Result<BookSummary> {
        let work = self
            .catalog
            .fetch_work(key)
            .await
            .map_err(|e| AppError::detail_fetch(key, e))?;

        let authors = self.resolve_authors(&work).await;
        let summary = self.summarize(key, work, authors);

        log::debug!(
            "Resolved {} \"{}\" ({} authors, {} genres)",
            summary.id,
            summary.title,
            summary.authors.len(),
            summary.genres.len()
        );
        Ok(summary)
    }

    /// Fetch every referenced author in parallel and keep the ones that resolve.
    async fn resolve_authors(&self, work: &WorkRecord) -> Vec<String> {
        let keys = work.author_keys();
        let lookups = keys.iter().map(|key| async move {
            let result = self.catalog.fetch_author(key).await;
            (key, result)
        });

        let mut names = Vec::new();
        for (key, result) in future::join_all(lookups).await {
            match result {
                Ok(author) => match author.display_name() {
                    Some(name) => names.push(name.to_string()),
                    None => log::debug!("Author {} has no name", key),
                },
                Err(e) => log::warn!("Failed to resolve author {}: {}", key, e),
            }
        }

        if names.is_empty() {
            vec![UNKNOWN_AUTHOR.to_string()]
        } else {
            names
        }
    }

    fn summarize(&self, key: &str, work: WorkRecord, authors: Vec<String>) -> BookSummary {
        let cover_url = work
            .cover_id()
            .and_then(|id| self.config.catalog.cover_url(id, CoverSize::Large));

        let description = work
            .description
            .as_ref()
            .and_then(Description::text)
            .unwrap_or(NO_DESCRIPTION)
            .to_string();

        let title = work
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_TITLE)
            .to_string();

        let genres = work
            .subjects
            .into_iter()
            .take(self.config.enrichment.genre_limit)
            .collect();

        BookSummary {
            id: work.key.unwrap_or_else(|| key.to_string()),
            title,
            authors,
            cover_url,
            description,
            genres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;

    use crate::services::testing::FakeCatalog;

    fn hobbit() -> WorkRecord {
        serde_json::from_value(json!({
            "key": "/works/OL45883W",
            "title": "The Hobbit",
            "covers": [8231856],
            "authors": [
                { "author": { "key": "/authors/OL26320A" } },
                { "author": { "key": "/authors/OL2A" } }
            ],
            "description": { "type": "/type/text", "value": "A hobbit goes on an adventure." },
            "subjects": ["Fantasy", "Dragons", "Wizards", "Dwarves", "Elves", "Quests", "Maps"]
        }))
        .unwrap()
    }

    fn resolver(catalog: FakeCatalog) -> BookDetailResolver {
        BookDetailResolver::new(Arc::new(Config::default()), Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_resolve_full_record() {
        let catalog = FakeCatalog::default()
            .with_work("/works/OL45883W", hobbit())
            .with_author("/authors/OL26320A", "J.R.R. Tolkien")
            .with_author("/authors/OL2A", "Christopher Tolkien");

        let book = resolver(catalog).resolve("/works/OL45883W").await.unwrap();
        assert_eq!(book.id, "/works/OL45883W");
        assert_eq!(book.title, "The Hobbit");
        assert_eq!(book.authors, vec!["J.R.R. Tolkien", "Christopher Tolkien"]);
        assert_eq!(
            book.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/8231856-L.jpg")
        );
        assert_eq!(book.description, "A hobbit goes on an adventure.");
        assert_eq!(
            book.genres,
            vec!["Fantasy", "Dragons", "Wizards", "Dwarves", "Elves"]
        );
    }

    #[tokio::test]
    async fn test_partial_author_failure_keeps_resolved_names() {
        let catalog = FakeCatalog::default()
            .with_work("/works/OL45883W", hobbit())
            .with_author("/authors/OL2A", "Christopher Tolkien");

        let book = resolver(catalog).resolve("/works/OL45883W").await.unwrap();
        assert_eq!(book.authors, vec!["Christopher Tolkien"]);
    }

    #[tokio::test]
    async fn test_total_author_failure_uses_placeholder() {
        let catalog = FakeCatalog::default().with_work("/works/OL45883W", hobbit());

        let book = resolver(catalog).resolve("/works/OL45883W").await.unwrap();
        assert_eq!(book.authors, vec![UNKNOWN_AUTHOR]);
        assert_eq!(book.title, "The Hobbit");
    }

    #[tokio::test]
    async fn test_sparse_record_placeholders() {
        let work: WorkRecord = serde_json::from_value(json!({
            "description": "Plain string description"
        }))
        .unwrap();
        let catalog = FakeCatalog::default().with_work("/works/OL9W", work);

        let book = resolver(catalog).resolve("/works/OL9W").await.unwrap();
        assert_eq!(book.id, "/works/OL9W");
        assert_eq!(book.title, UNKNOWN_TITLE);
        assert_eq!(book.authors, vec![UNKNOWN_AUTHOR]);
        assert_eq!(book.cover_url, None);
        assert_eq!(book.description, "Plain string description");
        assert!(book.genres.is_empty());

        let empty = FakeCatalog::default().with_work("/works/OL8W", WorkRecord::default());
        let book = resolver(empty).resolve("/works/OL8W").await.unwrap();
        assert_eq!(book.description, NO_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_work_failure_is_detail_fetch_error() {
        let err = resolver(FakeCatalog::default())
            .resolve("/works/OL404W")
            .await
            .unwrap_err();
        match err {
            AppError::DetailFetch { key, .. } => assert_eq!(key, "/works/OL404W"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_authors_resolve_in_parallel() {
        let catalog = FakeCatalog::default()
            .with_work("/works/OL45883W", hobbit())
            .with_author("/authors/OL26320A", "J.R.R. Tolkien")
            .with_author("/authors/OL2A", "Christopher Tolkien")
            .with_delay(Duration::from_millis(100));

        let start = tokio::time::Instant::now();
        resolver(catalog).resolve("/works/OL45883W").await.unwrap();
        // one work fetch, then both authors side by side
        assert!(start.elapsed() < Duration::from_millis(300));
    }
}
