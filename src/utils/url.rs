// src/utils/url.rs

//! URL and catalog key utilities.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::{AppError, Result};

/// Join a base URL and a path without dropping the base's own path segments.
///
/// # Examples
/// ```
/// use shelfmate::utils::url::endpoint;
///
/// assert_eq!(
///     endpoint("http://localhost:3000/api", "/users/me").unwrap().as_str(),
///     "http://localhost:3000/api/users/me"
/// );
/// ```
pub fn endpoint(base: &str, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Ok(Url::parse(&joined)?)
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^/?(?:(works|authors|books)/)?(OL\d+([WAM]))$").expect("valid key pattern")
    })
}

/// Normalize a catalog identifier to its canonical key form.
///
/// Accepts bare ids (`OL45883W`) as well as keys with or without the leading
/// slash; the collection is inferred from the id suffix when missing.
///
/// # Examples
/// ```
/// use shelfmate::utils::url::normalize_key;
///
/// assert_eq!(normalize_key("OL45883W").unwrap(), "/works/OL45883W");
/// assert_eq!(normalize_key("authors/OL26320A").unwrap(), "/authors/OL26320A");
/// ```
pub fn normalize_key(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let caps = key_pattern()
        .captures(trimmed)
        .ok_or_else(|| AppError::validation(format!("Invalid catalog key '{trimmed}'")))?;

    let id = &caps[2];
    let inferred = match &caps[3] {
        "W" => "works",
        "A" => "authors",
        _ => "books",
    };
    let collection = caps.get(1).map_or(inferred, |m| m.as_str());
    if collection != inferred {
        return Err(AppError::validation(format!(
            "Catalog key '{trimmed}' does not match its collection"
        )));
    }
    Ok(format!("/{collection}/{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        assert_eq!(
            endpoint("https://example.com/api/", "users/u1").unwrap().as_str(),
            "https://example.com/api/users/u1"
        );
        assert_eq!(
            endpoint("https://openlibrary.org", "/works/OL1W.json")
                .unwrap()
                .as_str(),
            "https://openlibrary.org/works/OL1W.json"
        );
        assert!(endpoint("not a url", "/x").is_err());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("/works/OL45883W").unwrap(), "/works/OL45883W");
        assert_eq!(normalize_key("works/OL45883W").unwrap(), "/works/OL45883W");
        assert_eq!(normalize_key(" OL45883W ").unwrap(), "/works/OL45883W");
        assert_eq!(normalize_key("OL7353617M").unwrap(), "/books/OL7353617M");
    }

    #[test]
    fn test_normalize_key_rejects_garbage() {
        assert!(normalize_key("").is_err());
        assert!(normalize_key("/works/OL1A").is_err());
        assert!(normalize_key("hobbit").is_err());
        assert!(normalize_key("/works/OL1W/extra").is_err());
    }
}
