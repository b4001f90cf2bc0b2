//! Raw records returned by the book catalog.
//!
//! These mirror the catalog's JSON loosely: every field is optional so that a
//! sparse record still parses and normalization can substitute placeholders.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A work record (`/works/{id}.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkRecord {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Numeric cover identifiers, best first
    #[serde(default)]
    pub covers: Vec<i64>,

    /// Author references in credit order
    #[serde(default)]
    pub authors: Vec<AuthorRole>,

    #[serde(default)]
    pub description: Option<Description>,

    #[serde(default)]
    pub subjects: Vec<String>,
}

impl WorkRecord {
    /// First usable cover id.
    pub fn cover_id(&self) -> Option<i64> {
        self.covers.iter().copied().find(|id| *id > 0)
    }

    /// Author keys in credit order, skipping malformed entries.
    pub fn author_keys(&self) -> Vec<String> {
        self.authors
            .iter()
            .filter_map(|role| role.key().map(str::to_string))
            .collect()
    }
}

/// One entry of a work's `authors` array.
///
/// Works nest the reference (`{"author": {"key": ..}}`) while editions put the
/// key at the top level; both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorRole {
    #[serde(default)]
    pub author: Option<KeyRef>,

    #[serde(default)]
    pub key: Option<String>,
}

impl AuthorRole {
    pub fn key(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.key.as_str())
            .or(self.key.as_deref())
            .filter(|k| !k.is_empty())
    }
}

/// A `{"key": "..."}` reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRef {
    pub key: String,
}

/// A work description: plain text or a typed text block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Typed { value: String },
    Other(Value),
}

impl Description {
    /// Plain text of the description, if any.
    pub fn text(&self) -> Option<&str> {
        let text = match self {
            Description::Text(s) => s.as_str(),
            Description::Typed { value } => value.as_str(),
            Description::Other(_) => return None,
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// An author record (`/authors/{id}.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorRecord {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub personal_name: Option<String>,
}

impl AuthorRecord {
    /// Display name, preferring `name` over `personal_name`.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.personal_name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Search endpoint envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "numFound")]
    pub num_found: u64,

    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// One search hit, restricted to the requested fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchDoc {
    /// Work key; kept untyped because malformed hits must be skipped, not fail the page
    #[serde(default)]
    pub key: Option<Value>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub author_name: Vec<String>,

    #[serde(default)]
    pub cover_i: Option<i64>,
}

impl SearchDoc {
    /// The work key when it is a non-empty string.
    pub fn work_key(&self) -> Option<&str> {
        self.key
            .as_ref()
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
    }
}
