//! Search metrics
//!
//! A small in-process accumulator for request counts and latencies. Like the
//! cache, this is an explicit service handle rather than module-level state:
//! construct once, share via `Arc`.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Accumulates search counters and total latency
#[derive(Debug, Default)]
pub struct Metrics {
    searches: AtomicU64,
    cache_hits: AtomicU64,
    errors: AtomicU64,
    total_duration_micros: AtomicU64,
}

/// Point-in-time view of the accumulated metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub cache_hits: u64,
    pub errors: u64,
    pub avg_duration_micros: u64,
}

impl Metrics {
    /// Create a fresh accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed search and its latency
    pub fn record_search(&self, duration: Duration) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.total_duration_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// Record a search answered from the cache
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed search
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the current counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let searches = self.searches.load(Ordering::Relaxed);
        let total = self.total_duration_micros.load(Ordering::Relaxed);
        MetricsSnapshot {
            searches,
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            avg_duration_micros: if searches > 0 { total / searches } else { 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let metrics = Metrics::new();
        let snap = metrics.snapshot();
        assert_eq!(snap.searches, 0);
        assert_eq!(snap.avg_duration_micros, 0);
    }

    #[test]
    fn test_average_latency() {
        let metrics = Metrics::new();
        metrics.record_search(Duration::from_micros(100));
        metrics.record_search(Duration::from_micros(300));
        let snap = metrics.snapshot();
        assert_eq!(snap.searches, 2);
        assert_eq!(snap.avg_duration_micros, 200);
    }

    #[test]
    fn test_cache_hits_and_errors() {
        let metrics = Metrics::new();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_error();
        let snap = metrics.snapshot();
        assert_eq!(snap.cache_hits, 2);
        assert_eq!(snap.errors, 1);
    }
}
