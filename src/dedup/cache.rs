use lru::LruCache;
use std::num::NonZeroUsize;

/// Capacity-bounded map from fingerprint to expiry time.
///
/// Implementations must evict rather than refuse an insert when full.
/// Callers serialize access (the guard keeps each cache behind a mutex).
pub trait SeenCache: Send {
    /// Whether `key` holds an entry still live at `now_ms`.
    ///
    /// A hit counts as a use for eviction purposes. Expired entries read as absent.
    fn get_if_present(&mut self, key: &str, now_ms: u64) -> bool;

    /// Insert or overwrite `key`, returning the key evicted to make room, if any.
    fn put_with_expiry(&mut self, key: &str, expires_at_ms: u64) -> Option<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;
}

/// [`SeenCache`] evicting the least recently used fingerprint first.
pub struct LruSeenCache {
    entries: LruCache<String, u64>,
}

impl LruSeenCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }
}

impl SeenCache for LruSeenCache {
    fn get_if_present(&mut self, key: &str, now_ms: u64) -> bool {
        let expires_at = self.entries.get(key).copied();
        match expires_at {
            Some(expires_at) if now_ms < expires_at => true,
            Some(_) => {
                self.entries.pop(key);
                false
            }
            None => false,
        }
    }

    fn put_with_expiry(&mut self, key: &str, expires_at_ms: u64) -> Option<String> {
        match self.entries.push(key.to_string(), expires_at_ms) {
            Some((evicted, _)) if evicted != key => Some(evicted),
            _ => None,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> LruSeenCache {
        LruSeenCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn test_entry_expires_at_deadline() {
        let mut cache = cache(4);
        cache.put_with_expiry("a", 100);

        assert!(cache.get_if_present("a", 99));
        assert!(!cache.get_if_present("a", 100));
        // expired entries are dropped on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = cache(2);
        assert_eq!(cache.put_with_expiry("a", 1_000), None);
        assert_eq!(cache.put_with_expiry("b", 1_000), None);

        // touching "a" makes "b" the eviction candidate
        assert!(cache.get_if_present("a", 0));
        assert_eq!(cache.put_with_expiry("c", 1_000), Some("b".to_string()));

        assert!(cache.get_if_present("a", 0));
        assert!(!cache.get_if_present("b", 0));
        assert!(cache.get_if_present("c", 0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_overwrite_is_not_an_eviction() {
        let mut cache = cache(1);
        cache.put_with_expiry("a", 10);
        assert_eq!(cache.put_with_expiry("a", 20), None);
        assert!(cache.get_if_present("a", 15));
    }
}
