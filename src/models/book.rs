//! Book view models built from catalog records.

use serde::{Deserialize, Serialize};

/// Placeholder title for records without one.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Placeholder author list entry.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Placeholder description.
pub const NO_DESCRIPTION: &str = "No description available";

/// Normalized book detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    /// Catalog work key (e.g. `/works/OL45883W`)
    pub id: String,

    pub title: String,

    /// Author display names in credit order
    pub authors: Vec<String>,

    /// Derived from the first cover id; never an empty string
    pub cover_url: Option<String>,

    pub description: String,

    /// First few subject tags
    pub genres: Vec<String>,
}

/// A related book surfaced by a subject search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarBookCandidate {
    pub title: String,

    pub primary_author: String,

    /// Dedup key across subject queries
    pub work_key: String,

    pub cover_url: Option<String>,

    /// First subject that surfaced this work
    pub source_subject: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = BookSummary {
            id: "/works/OL1W".into(),
            title: "T".into(),
            authors: vec![UNKNOWN_AUTHOR.into()],
            cover_url: None,
            description: NO_DESCRIPTION.into(),
            genres: vec![],
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("coverUrl").is_some());
        assert!(value["coverUrl"].is_null());
    }
}
