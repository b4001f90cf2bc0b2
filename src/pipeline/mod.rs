//! Page loading entry points.
//!
//! - `load_book_page`: book detail plus similar books
//! - `load_feed`: activity feed for the current session

pub mod book_page;
pub mod feed;

pub use book_page::{BookPage, load_book_page};
pub use feed::load_feed;
