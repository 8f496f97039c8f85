//! Shared health state for the /health endpoint.
//! Updated by the stats handlers whenever a collection runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Shared health metrics. Updated by request handlers, read by /health.
pub struct HealthState {
    started_at: Instant,
    /// Unix seconds of the last completed season collection (0 = none yet).
    last_collection_at: AtomicU64,
    requests_served: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            last_collection_at: AtomicU64::new(0),
            requests_served: AtomicU64::new(0),
        }
    }

    pub fn mark_collection(&self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.last_collection_at.store(now, Ordering::Relaxed);
    }

    pub fn inc_requests(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn last_collection_at(&self) -> u64 {
        self.last_collection_at.load(Ordering::Relaxed)
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
