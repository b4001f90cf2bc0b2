// src/pipeline/feed.rs

//! Activity feed loading.

use crate::error::Result;
use crate::models::EnrichedActivity;
use crate::services::{ActivityEnricher, BackendApi};
use crate::session::SessionStore;
use crate::utils::Liveness;

/// Load activities into the session and enrich the most recent ones.
///
/// Returns `Ok(None)` when the feed went away before loading finished; the
/// session store is left untouched if that happens before the fetch lands.
pub async fn load_feed(
    backend: &dyn BackendApi,
    store: &SessionStore,
    enricher: &ActivityEnricher,
    liveness: &Liveness,
) -> Result<Option<Vec<EnrichedActivity>>> {
    let Some(activities) = liveness.guard(backend.fetch_activities()).await else {
        return Ok(None);
    };
    let activities = activities?;
    log::debug!("Fetched {} activities", activities.len());
    store.set_activities(activities);

    let events = store.read(|s| s.activities.clone());
    let Some(feed) = liveness.guard(enricher.enrich(&events)).await else {
        return Ok(None);
    };
    log::info!("Feed ready with {} of {} activities", feed.len(), events.len());
    Ok(Some(feed))
}
