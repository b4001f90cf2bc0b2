// src/services/activity.rs

//! Activity enrichment pipeline.
//!
//! Picks the most recent events and resolves, per event, the acting user's
//! profile and the referenced book's title. Each lookup fails on its own:
//! a failed lookup yields placeholders for its fields, never a dropped item.

use std::sync::Arc;

use futures::future;

use crate::models::{
    ActivityEvent, Config, EnrichedActivity, UNKNOWN_TITLE, UNKNOWN_USER, UNKNOWN_USERNAME,
    UserProfile,
};
use crate::services::{BackendApi, CatalogClient};

/// Enriches raw activity events for display.
pub struct ActivityEnricher {
    config: Arc<Config>,
    catalog: Arc<dyn CatalogClient>,
    backend: Arc<dyn BackendApi>,
}

impl ActivityEnricher {
    pub fn new(
        config: Arc<Config>,
        catalog: Arc<dyn CatalogClient>,
        backend: Arc<dyn BackendApi>,
    ) -> Self {
        Self {
            config,
            catalog,
            backend,
        }
    }

    /// Enrich the most recent events, newest first.
    pub async fn enrich(&self, events: &[ActivityEvent]) -> Vec<EnrichedActivity> {
        if events.is_empty() {
            return Vec::new();
        }

        let recent = select_recent(events, self.config.enrichment.activity_limit);
        // join_all yields in input order, which is the recency order
        future::join_all(recent.into_iter().map(|event| self.enrich_one(event))).await
    }

    async fn enrich_one(&self, event: &ActivityEvent) -> EnrichedActivity {
        let (profile, work) = tokio::join!(
            self.backend.fetch_user_profile(&event.user_id),
            self.catalog.fetch_work(&event.book_key),
        );

        let book_title = match work {
            Ok(work) => work
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            Err(e) => {
                log::warn!(
                    "Activity {}: failed to fetch book {}: {}",
                    event.id,
                    event.book_key,
                    e
                );
                UNKNOWN_TITLE.to_string()
            }
        };

        let profile = profile.unwrap_or_else(|e| {
            log::warn!(
                "Activity {}: failed to fetch user {}: {}",
                event.id,
                event.user_id,
                e
            );
            placeholder_profile(&event.user_id)
        });

        EnrichedActivity {
            event: event.clone(),
            book_title,
            user_full_name: non_empty_or(profile.full_name, UNKNOWN_USER),
            user_name: non_empty_or(profile.username, UNKNOWN_USERNAME),
            user_profile_pic: profile.profile_pic,
        }
    }
}

/// The `limit` most recent events, newest first. Ties keep input order.
pub fn select_recent(events: &[ActivityEvent], limit: usize) -> Vec<&ActivityEvent> {
    let mut sorted: Vec<&ActivityEvent> = events.iter().collect();
    sorted.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    sorted.truncate(limit);
    sorted
}

fn placeholder_profile(user_id: &str) -> UserProfile {
    UserProfile {
        id: user_id.to_string(),
        full_name: UNKNOWN_USER.to_string(),
        username: UNKNOWN_USERNAME.to_string(),
        profile_pic: String::new(),
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
