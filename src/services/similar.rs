// src/services/similar.rs

//! Similar-books aggregator.
//!
//! Queries the catalog one subject at a time and merges hits keyed by work
//! key. Subjects are queried strictly in input order so that the first
//! subject to surface a work always wins attribution.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, CoverSize, SimilarBookCandidate, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
use crate::services::CatalogClient;

/// Aggregates similar-book candidates across subject searches.
pub struct SimilarBooksAggregator {
    config: Arc<Config>,
    catalog: Arc<dyn CatalogClient>,
}

impl SimilarBooksAggregator {
    pub fn new(config: Arc<Config>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self { config, catalog }
    }

    /// Candidates related to `book_key` through its `subjects`.
    ///
    /// Any failed subject query aborts the whole aggregation; the failure is
    /// logged and an empty list is returned.
    pub async fn fetch_similar(
        &self,
        book_key: &str,
        subjects: &[String],
    ) -> Vec<SimilarBookCandidate> {
        match self.try_fetch_similar(book_key, subjects).await {
            Ok(candidates) => candidates,
            Err(e) => {
                log::error!("Failed to fetch similar books for {}: {}", book_key, e);
                Vec::new()
            }
        }
    }

    /// Like [`fetch_similar`](Self::fetch_similar) but surfaces the failure.
    pub async fn try_fetch_similar(
        &self,
        book_key: &str,
        subjects: &[String],
    ) -> Result<Vec<SimilarBookCandidate>> {
        let limits = &self.config.enrichment;
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();

        for subject in subjects.iter().take(limits.similar_subject_limit) {
            let docs = self
                .catalog
                .search(subject, limits.similar_per_subject)
                .await?;

            let before = candidates.len();
            for doc in docs {
                let Some(work_key) = doc.work_key() else {
                    continue;
                };
                if work_key == book_key || !seen.insert(work_key.to_string()) {
                    continue;
                }

                candidates.push(SimilarBookCandidate {
                    title: doc.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                    primary_author: doc
                        .author_name
                        .first()
                        .cloned()
                        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
                    work_key: work_key.to_string(),
                    cover_url: doc
                        .cover_i
                        .and_then(|id| self.config.catalog.cover_url(id, CoverSize::Medium)),
                    source_subject: subject.clone(),
                });
            }

            log::debug!(
                "Subject \"{}\" contributed {} new candidates",
                subject,
                candidates.len() - before
            );
        }

        candidates.truncate(limits.similar_max_results);
        Ok(candidates)
    }
}
