// src/pipeline/book_page.rs

//! Book detail page loading.

use serde::Serialize;

use crate::models::{BookSummary, SimilarBookCandidate};
use crate::services::{BookDetailResolver, SimilarBooksAggregator};
use crate::utils::Liveness;

/// Everything the book page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub detail: Option<BookSummary>,
    pub similar: Vec<SimilarBookCandidate>,
    /// Display message when the detail could not be loaded
    pub error: Option<String>,
}

/// Load the detail for `key`, then books similar to it through its genres.
///
/// Returns `None` when the page went away before loading finished.
pub async fn load_book_page(
    resolver: &BookDetailResolver,
    aggregator: &SimilarBooksAggregator,
    key: &str,
    liveness: &Liveness,
) -> Option<BookPage> {
    let detail = match liveness.guard(resolver.resolve(key)).await? {
        Ok(detail) => detail,
        Err(e) => {
            log::error!("{}", e);
            return Some(BookPage {
                error: Some(e.to_string()),
                ..BookPage::default()
            });
        }
    };

    let similar = liveness
        .guard(aggregator.fetch_similar(&detail.id, &detail.genres))
        .await?;

    log::info!(
        "Loaded \"{}\" with {} similar books",
        detail.title,
        similar.len()
    );
    Some(BookPage {
        detail: Some(detail),
        similar,
        error: None,
    })
}
