//! Service layer.
//!
//! - Catalog and backend clients (`OpenLibraryClient`, `HttpBackend`)
//! - Book detail resolution (`BookDetailResolver`)
//! - Similar-book aggregation (`SimilarBooksAggregator`)
//! - Activity enrichment (`ActivityEnricher`)
//! - Shelf and favorite synchronization (`StatusSynchronizer`)

mod activity;
mod backend;
mod book_detail;
mod catalog;
mod effects;
mod similar;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use activity::{ActivityEnricher, select_recent};
pub use backend::{BackendApi, HttpBackend};
pub use book_detail::BookDetailResolver;
pub use catalog::{CatalogClient, OpenLibraryClient};
pub use effects::{NavigationState, Navigator, Notifier, Toast, ToastKind, ToastPosition};
pub use similar::SimilarBooksAggregator;
pub use sync::{
    FavoriteAction, FavoriteKind, FavoriteSynchronizer, ShelfKind, ShelfSynchronizer,
    StatusKind, StatusSynchronizer, SyncContext, SyncOutcome, SyncState,
};
