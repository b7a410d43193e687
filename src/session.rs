//! Stale-result discard for in-flight requests
//!
//! Each user-triggered call gets a token from a shared generation counter.
//! When a newer call starts, older tokens go stale; a caller holding a stale
//! token drops its result instead of applying it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues request tokens from a monotonically increasing generation counter
#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
}

impl RequestTracker {
    /// Create a new tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, invalidating all previously issued tokens
    #[must_use]
    pub fn begin(&self) -> RequestToken {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken {
            id,
            latest: Arc::clone(&self.latest),
        }
    }
}

/// Identity of one in-flight request
#[derive(Debug, Clone)]
pub struct RequestToken {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl RequestToken {
    /// Whether this token still identifies the most recent request.
    ///
    /// Results arriving on a stale token must be discarded, not applied.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.id
    }
}
