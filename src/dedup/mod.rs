// ============================================================================
// Windowed Duplicate-Submission Guard
// ============================================================================
//
// Answers "was this fingerprint seen within the last `window`?" and marks it
// as seen in the same step. Entries expire by time only; a duplicate hit does
// not extend the window.
//
// Fingerprints are spread over independently locked shards, so the
// check-and-mark for one fingerprint is atomic while unrelated fingerprints
// rarely wait on each other.
//
// ============================================================================

pub mod cache;

pub use cache::{LruSeenCache, SeenCache};

use crate::core::{Clock, Result, SystemClock, TxnError};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_SHARDS: usize = 16;

/// Counters since the guard was created, plus the current entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub lookups: u64,
    pub duplicates: u64,
    pub evictions: u64,
    pub entries: usize,
}

pub struct DedupGuard<S: SeenCache = LruSeenCache> {
    shards: Vec<Mutex<S>>,
    window: Duration,
    clock: Arc<dyn Clock>,
    lookups: AtomicU64,
    duplicates: AtomicU64,
    evictions: AtomicU64,
}

impl DedupGuard<LruSeenCache> {
    /// LRU-backed guard on the system clock.
    pub fn new(window: Duration, max_entries: usize) -> Result<Self> {
        Self::with_clock(window, max_entries, DEFAULT_SHARDS, Arc::new(SystemClock))
    }

    /// LRU-backed guard holding at most `max_entries` fingerprints across `shards`.
    ///
    /// The shard count is capped at `max_entries` so every shard keeps room
    /// for at least one entry.
    pub fn with_clock(
        window: Duration,
        max_entries: usize,
        shards: usize,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if max_entries == 0 {
            return Err(TxnError::InvalidConfig(
                "dedup max_entries must be > 0".to_string(),
            ));
        }
        if shards == 0 {
            return Err(TxnError::InvalidConfig(
                "dedup shards must be > 0".to_string(),
            ));
        }

        // Shard capacities sum to exactly `max_entries`; the first
        // `max_entries % shards` shards take one extra slot.
        let shards = shards.min(max_entries);
        let base = max_entries / shards;
        let extra = max_entries % shards;
        let caches = (0..shards)
            .map(|index| {
                let slots = base + usize::from(index < extra);
                NonZeroUsize::new(slots).map(LruSeenCache::new).ok_or_else(|| {
                    TxnError::InvalidConfig("dedup shard capacity is zero".to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::with_caches(caches, window, clock)
    }
}

impl<S: SeenCache> DedupGuard<S> {
    /// Guard over caller-supplied caches, one per shard.
    pub fn with_caches(caches: Vec<S>, window: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        if caches.is_empty() {
            return Err(TxnError::InvalidConfig(
                "dedup guard needs at least one cache".to_string(),
            ));
        }
        if window.is_zero() {
            return Err(TxnError::InvalidConfig(
                "dedup window must be > 0".to_string(),
            ));
        }

        Ok(Self {
            shards: caches.into_iter().map(Mutex::new).collect(),
            window,
            clock,
            lookups: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    /// Returns `true` if `fingerprint` was already seen within the window.
    ///
    /// A fingerprint that is absent or expired is recorded in the same step,
    /// with expiry `now + window`. Of several concurrent calls with one
    /// fingerprint, exactly one returns `false`.
    pub fn check_and_mark(&self, fingerprint: &str) -> bool {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        let mut shard = self.lock_shard(fingerprint);
        let now = self.clock.now_millis();

        if shard.get_if_present(fingerprint, now) {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
            return true;
        }

        let expires_at = now.saturating_add(self.window.as_millis() as u64);
        if let Some(evicted) = shard.put_with_expiry(fingerprint, expires_at) {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(evicted = %evicted, "dedup cache full, evicted least recently seen fingerprint");
        }
        false
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Entries currently held, including expired ones not yet read again.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(PoisonError::into_inner).capacity())
            .sum()
    }

    pub fn stats(&self) -> DedupStats {
        DedupStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    // The shard state is a plain cache, so a panic elsewhere cannot leave it
    // half-updated; recover the guard instead of failing the check.
    fn lock_shard(&self, fingerprint: &str) -> MutexGuard<'_, S> {
        let mut hasher = DefaultHasher::new();
        fingerprint.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();

        self.shards[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: SeenCache> std::fmt::Debug for DedupGuard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupGuard")
            .field("window", &self.window)
            .field("shards", &self.shards.len())
            .finish()
    }
}
