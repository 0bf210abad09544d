//! In-process TTL cache
//!
//! Best-effort memoization for assembled search results. The cache is an
//! explicit service: construct one at startup and hand it to whatever needs
//! it. Entries carry their own TTL; expiry is lazy (checked on read, pruned
//! on write). Concurrent writers race with last-write-wins semantics, which
//! costs at most a cache miss.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// A keyed TTL cache with per-entry expiry
pub struct TtlCache<V: Clone> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a live entry, returning a clone of the stored value.
    /// Expired entries are removed on the way out.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value under the given key for `ttl`. Overwrites any existing
    /// entry; prunes expired entries while holding the lock.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    /// Number of entries currently held, including not-yet-pruned expired
    /// ones
    pub fn size(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache = TtlCache::new();
        cache.set("a", 1, Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_missing_key() {
        let cache: TtlCache<i32> = TtlCache::new();
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = TtlCache::new();
        cache.set("a", 1, Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_overwrite_is_last_write_wins() {
        let cache = TtlCache::new();
        cache.set("a", 1, Duration::from_secs(60));
        cache.set("a", 2, Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_set_prunes_expired_entries() {
        let cache = TtlCache::new();
        cache.set("old", 1, Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        cache.set("new", 2, Duration::from_secs(60));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_per_entry_ttl() {
        let cache = TtlCache::new();
        cache.set("short", 1, Duration::from_millis(0));
        cache.set("long", 2, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("long"), Some(2));
    }
}
