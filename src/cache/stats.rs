//! Cache Statistics Module
//!
//! Tracks how `fetch` calls were served.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of fetch outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Fetches served from a fresh entry
    pub hits: u64,
    /// Fetches that found no entry and computed one
    pub misses: u64,
    /// Fetches that found a stale entry and attempted a recompute
    pub stale_hits: u64,
    /// Computed values written back by fetch
    pub recomputes: u64,
    /// Stale values served because a recompute overran its deadline
    pub deadline_exceeded: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Share of fetches answered from an existing entry, fresh or stale.
    ///
    /// Returns 0.0 if no fetches have been made.
    pub fn hit_rate(&self) -> f64 {
        let served = self.hits + self.stale_hits;
        let total = served + self.misses;
        if total == 0 {
            0.0
        } else {
            served as f64 / total as f64
        }
    }
}

/// Lock-free counters behind [`CacheStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    stale_hits: AtomicU64,
    recomputes: AtomicU64,
    deadline_exceeded: AtomicU64,
}

impl StatsRecorder {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_hit(&self) {
        self.stale_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recompute(&self) {
        self.recomputes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deadline_exceeded(&self) {
        self.deadline_exceeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_hits: self.stale_hits.load(Ordering::Relaxed),
            recomputes: self.recomputes.load(Ordering::Relaxed),
            deadline_exceeded: self.deadline_exceeded.load(Ordering::Relaxed),
        }
    }
}
