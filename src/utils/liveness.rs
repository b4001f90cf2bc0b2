// src/utils/liveness.rs

//! Mount liveness tokens.
//!
//! Fetches cannot be cancelled mid-flight. A view holds a [`Liveness`] and
//! clones it into every async job; once the view is gone, results arriving
//! later are dropped instead of being published.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag that is true while the owning view is mounted.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Mark the owner as unmounted. Idempotent.
    pub fn kill(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Await `fut` and keep its output only if the owner is still mounted.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        let output = fut.await;
        if self.is_alive() {
            Some(output)
        } else {
            log::debug!("Discarding result that arrived after unmount");
            None
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
