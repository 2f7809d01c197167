//! In-memory cache for GraphQL query results.
//!
//! Entries are keyed by operation name plus serialized variables, bounded by
//! a byte budget (least recently used entries go first) and dropped once
//! they are older than the configured lifetime.

use lru::LruCache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub size_bytes: usize,
    pub max_size_bytes: usize,
}

struct CacheEntry {
    data: Vec<u8>,
    stored_at: Instant,
}

struct CacheState {
    entries: LruCache<u64, CacheEntry>,
    size_bytes: usize,
}

/// Size-bounded, time-expiring result cache shared by all queries of a client
pub struct MemoryCache {
    state: Mutex<CacheState>,
    max_size_bytes: usize,
    expire_after: Duration,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("max_size_bytes", &self.max_size_bytes)
            .field("expire_after", &self.expire_after)
            .finish_non_exhaustive()
    }
}

impl MemoryCache {
    /// Create a new cache
    pub fn new(max_size_bytes: usize, expire_after: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::unbounded(),
                size_bytes: 0,
            }),
            max_size_bytes,
            expire_after,
        }
    }

    /// Derive the cache key for an operation and its serialized variables
    pub fn key(operation: &str, variables: &[u8]) -> u64 {
        let mut hasher = DefaultHasher::new();
        operation.hash(&mut hasher);
        variables.hash(&mut hasher);
        hasher.finish()
    }

    /// Get a cached payload if it exists and has not expired
    pub fn get(&self, key: u64) -> Option<Vec<u8>> {
        let mut state = self.lock();

        let expired = match state.entries.get(&key) {
            None => {
                debug!(key = key, "Cache miss");
                return None;
            }
            Some(entry) if entry.stored_at.elapsed() < self.expire_after => {
                debug!(key = key, "Cache hit");
                return Some(entry.data.clone());
            }
            Some(_) => true,
        };

        if expired {
            if let Some(entry) = state.entries.pop(&key) {
                state.size_bytes -= entry.data.len();
            }
            debug!(key = key, "Cache entry expired");
        }
        None
    }

    /// Store a payload, evicting least recently used entries past the budget
    pub fn insert(&self, key: u64, data: Vec<u8>) {
        if data.len() > self.max_size_bytes {
            debug!(
                key = key,
                size_bytes = data.len(),
                "Payload larger than cache, not stored"
            );
            return;
        }

        let mut state = self.lock();
        let size = data.len();
        let entry = CacheEntry {
            data,
            stored_at: Instant::now(),
        };

        if let Some(previous) = state.entries.put(key, entry) {
            state.size_bytes -= previous.data.len();
        }
        state.size_bytes += size;

        while state.size_bytes > self.max_size_bytes {
            match state.entries.pop_lru() {
                Some((evicted, entry)) => {
                    state.size_bytes -= entry.data.len();
                    debug!(key = evicted, "Cache entry evicted");
                }
                None => break,
            }
        }
    }

    /// Remove every entry
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.size_bytes = 0;
        debug!("Cache cleared");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            entries: state.entries.len(),
            size_bytes: state.size_bytes,
            max_size_bytes: self.max_size_bytes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(max_size_bytes: usize) -> MemoryCache {
        MemoryCache::new(max_size_bytes, Duration::from_secs(30))
    }

    #[test]
    fn test_cache_hit_and_miss() {
        let cache = cache(1024);
        let key = MemoryCache::key("Media", br#"{"id":1}"#);

        assert_eq!(cache.get(key), None);
        cache.insert(key, b"payload".to_vec());
        assert_eq!(cache.get(key), Some(b"payload".to_vec()));
    }

    #[test]
    fn test_key_depends_on_operation_and_variables() {
        let a = MemoryCache::key("Media", br#"{"id":1}"#);
        let b = MemoryCache::key("Media", br#"{"id":2}"#);
        let c = MemoryCache::key("User", br#"{"id":1}"#);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, MemoryCache::key("Media", br#"{"id":1}"#));
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = MemoryCache::new(1024, Duration::ZERO);
        cache.insert(1, b"stale".to_vec());

        assert_eq!(cache.get(1), None);
        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.stats().size_bytes, 0);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache = cache(10);
        cache.insert(1, vec![0; 4]);
        cache.insert(2, vec![0; 4]);

        // Touch 1 so that 2 becomes the eviction candidate
        assert!(cache.get(1).is_some());
        cache.insert(3, vec![0; 4]);

        assert!(cache.get(1).is_some());
        assert!(cache.get(2).is_none());
        assert!(cache.get(3).is_some());
        assert_eq!(cache.stats().size_bytes, 8);
    }

    #[test]
    fn test_oversized_payload_is_skipped() {
        let cache = cache(4);
        cache.insert(1, vec![0; 5]);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_replacing_entry_updates_size() {
        let cache = cache(100);
        cache.insert(1, vec![0; 10]);
        cache.insert(1, vec![0; 3]);

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.size_bytes, 3);
    }

    #[test]
    fn test_clear() {
        let cache = cache(100);
        cache.insert(1, vec![1]);
        cache.insert(2, vec![2]);
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.size_bytes, 0);
    }
}
