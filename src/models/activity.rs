//! Activity feed events and their enriched form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::ShelfStatus;

/// What a user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityAction {
    AddToShelf,
    AddToJournal,
}

/// A 1 to 5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(AppError::validation(format!(
                "rating must be between 1 and 5, got {value}"
            )))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A raw activity event as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: String,
    pub user_id: String,
    pub action: ActivityAction,
    #[serde(default)]
    pub shelf_status: Option<ShelfStatus>,
    #[serde(default)]
    pub rating: Option<Rating>,
    pub book_key: String,
    pub occurred_at: DateTime<Utc>,
}

/// An activity with its user profile and book title resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedActivity {
    #[serde(flatten)]
    pub event: ActivityEvent,
    pub book_title: String,
    pub user_full_name: String,
    pub user_name: String,
    pub user_profile_pic: String,
}

impl EnrichedActivity {
    /// One-line description for feeds.
    pub fn headline(&self) -> String {
        match (self.event.action, self.event.shelf_status) {
            (ActivityAction::AddToShelf, Some(status)) if status != ShelfStatus::None => format!(
                "{} added \"{}\" to {}",
                self.user_full_name,
                self.book_title,
                status.label()
            ),
            (ActivityAction::AddToShelf, _) => {
                format!("{} shelved \"{}\"", self.user_full_name, self.book_title)
            }
            (ActivityAction::AddToJournal, _) => match self.event.rating {
                Some(rating) => format!(
                    "{} rated \"{}\" {}/5",
                    self.user_full_name,
                    self.book_title,
                    rating.value()
                ),
                None => format!(
                    "{} wrote about \"{}\"",
                    self.user_full_name, self.book_title
                ),
            },
        }
    }
}

/// Relative age of an event in its largest whole unit, e.g. `"3 hours ago"`.
///
/// Events in the future (clock skew) read as `"0 seconds ago"`.
pub fn time_ago(occurred_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - occurred_at).num_seconds().max(0);
    let (amount, unit) = match seconds {
        s if s < 60 => (s, "second"),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s => (s / 86_400, "day"),
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}
