//! Shelf placement values and user shelf actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Reading-progress classification of one book for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ShelfStatus {
    WantToRead,
    Ongoing,
    Completed,
    #[default]
    None,
}

impl ShelfStatus {
    /// Wire name used by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShelfStatus::WantToRead => "wantToRead",
            ShelfStatus::Ongoing => "ongoing",
            ShelfStatus::Completed => "completed",
            ShelfStatus::None => "none",
        }
    }

    /// Human-readable shelf name.
    pub fn label(&self) -> &'static str {
        match self {
            ShelfStatus::WantToRead => "Want to Read",
            ShelfStatus::Ongoing => "Currently Reading",
            ShelfStatus::Completed => "Completed",
            ShelfStatus::None => "Not on a shelf",
        }
    }

    /// Stored form: `None` is never stored, it is the absence of a value.
    pub fn stored(self) -> Option<ShelfStatus> {
        (self != ShelfStatus::None).then_some(self)
    }
}

impl fmt::Display for ShelfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-initiated shelf change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfAction {
    /// Place the book on a shelf
    Set(ShelfStatus),
    /// Take the book off every shelf
    Remove,
}

impl ShelfAction {
    /// Value to send to the backend; `None` clears the status.
    pub fn requested(&self) -> Option<ShelfStatus> {
        match self {
            ShelfAction::Set(status) => status.stored(),
            ShelfAction::Remove => None,
        }
    }
}

impl FromStr for ShelfAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "remove" | "none" => Ok(ShelfAction::Remove),
            "wantToRead" => Ok(ShelfAction::Set(ShelfStatus::WantToRead)),
            "ongoing" => Ok(ShelfAction::Set(ShelfStatus::Ongoing)),
            "completed" => Ok(ShelfAction::Set(ShelfStatus::Completed)),
            other => Err(AppError::validation(format!(
                "Unknown shelf action '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!("remove".parse::<ShelfAction>().unwrap(), ShelfAction::Remove);
        assert_eq!(
            "ongoing".parse::<ShelfAction>().unwrap(),
            ShelfAction::Set(ShelfStatus::Ongoing)
        );
        assert_eq!(
            "wantToRead".parse::<ShelfAction>().unwrap(),
            ShelfAction::Set(ShelfStatus::WantToRead)
        );
        assert!("reading".parse::<ShelfAction>().is_err());
    }

    #[test]
    fn test_remove_requests_clear() {
        assert_eq!(ShelfAction::Remove.requested(), None);
        assert_eq!(ShelfAction::Set(ShelfStatus::None).requested(), None);
        assert_eq!(
            ShelfAction::Set(ShelfStatus::Completed).requested(),
            Some(ShelfStatus::Completed)
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&ShelfStatus::WantToRead).unwrap(),
            "\"wantToRead\""
        );
        let status: ShelfStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, ShelfStatus::Completed);
        let cleared: Option<ShelfStatus> = serde_json::from_str("null").unwrap();
        assert_eq!(cleared, None);
    }
}
