//! Utility functions and helpers.

pub mod http;
pub mod liveness;
pub mod url;

pub use liveness::Liveness;
pub use url::{endpoint, normalize_key};
