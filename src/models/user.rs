//! User entities: the logged-in session user and public profiles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::ShelfStatus;

/// Placeholder full name when a profile cannot be resolved.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Placeholder username when a profile cannot be resolved.
pub const UNKNOWN_USERNAME: &str = "Unknown username";

/// Public profile of any user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub profile_pic: String,
}

/// The authenticated user together with the collections this client syncs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub full_name: String,

    /// Favorite book keys
    #[serde(default)]
    pub favorites: Vec<String>,

    /// Shelf placement per book key; absent means not shelved
    #[serde(default)]
    pub shelves: HashMap<String, ShelfStatus>,
}

impl SessionUser {
    pub fn is_favorite(&self, book_key: &str) -> bool {
        self.favorites.iter().any(|k| k == book_key)
    }

    pub fn shelf_status(&self, book_key: &str) -> Option<ShelfStatus> {
        self.shelves.get(book_key).copied().and_then(ShelfStatus::stored)
    }

    /// Record a confirmed shelf value; `None` removes the entry.
    pub fn set_shelf_status(&mut self, book_key: &str, status: Option<ShelfStatus>) {
        match status.and_then(ShelfStatus::stored) {
            Some(status) => {
                self.shelves.insert(book_key.to_string(), status);
            }
            None => {
                self.shelves.remove(book_key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_set_and_clear() {
        let mut user = SessionUser {
            id: "u1".into(),
            ..SessionUser::default()
        };
        user.set_shelf_status("/works/OL1W", Some(ShelfStatus::Ongoing));
        assert_eq!(user.shelf_status("/works/OL1W"), Some(ShelfStatus::Ongoing));

        user.set_shelf_status("/works/OL1W", None);
        assert_eq!(user.shelf_status("/works/OL1W"), None);
        assert!(user.shelves.is_empty());

        user.set_shelf_status("/works/OL1W", Some(ShelfStatus::None));
        assert!(user.shelves.is_empty());
    }

    #[test]
    fn test_session_user_wire_format() {
        let user: SessionUser = serde_json::from_str(
            r#"{"id":"u1","username":"reader","favorites":["/works/OL1W"],"shelves":{"/works/OL2W":"completed"}}"#,
        )
        .unwrap();
        assert!(user.is_favorite("/works/OL1W"));
        assert!(!user.is_favorite("/works/OL2W"));
        assert_eq!(user.shelf_status("/works/OL2W"), Some(ShelfStatus::Completed));
    }
}
