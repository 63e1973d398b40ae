// ============================================================================
// Monotonic Identifier Generator
// ============================================================================
//
// Snowflake-style generator: wall-clock milliseconds, a fixed region and
// instance identity, and a per-millisecond sequence counter.
//
// All decisions for one id (clock read, regression check, sequence bump,
// wait for the next tick, state update) run under a single mutex, so ids from
// one generator are unique and increase in the order the calls acquire it.
//
// ============================================================================

pub mod layout;

pub use layout::{IdParts, MAX_INSTANCE, MAX_REGION, SEQUENCE_MASK};

use crate::core::{Clock, RecordId, Result, SystemClock, TxnError};
use layout::MAX_TIMESTAMP;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

/// Mutable generator state. Only touched inside the generator's critical section.
#[derive(Debug, Default)]
struct GeneratorState {
    /// Epoch-relative millisecond of the last issued id, `None` before the first.
    last_timestamp: Option<u64>,
    sequence: u64,
}

pub struct SnowflakeGenerator {
    region: u64,
    instance: u64,
    epoch_ms: u64,
    clock: Arc<dyn Clock>,
    state: Mutex<GeneratorState>,
}

impl SnowflakeGenerator {
    /// Create a generator on the system clock with the Unix epoch.
    pub fn new(region: u64, instance: u64) -> Result<Self> {
        Self::with_clock(region, instance, Arc::new(SystemClock))
    }

    /// Create a generator reading time from `clock`.
    ///
    /// Fails with [`TxnError::InvalidConfig`] when `region` or `instance`
    /// exceed their 5-bit fields. Values are never truncated.
    pub fn with_clock(region: u64, instance: u64, clock: Arc<dyn Clock>) -> Result<Self> {
        if region > MAX_REGION {
            return Err(TxnError::InvalidConfig(format!(
                "region id {} out of range 0..={}",
                region, MAX_REGION
            )));
        }
        if instance > MAX_INSTANCE {
            return Err(TxnError::InvalidConfig(format!(
                "instance id {} out of range 0..={}",
                instance, MAX_INSTANCE
            )));
        }

        Ok(Self {
            region,
            instance,
            epoch_ms: 0,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    /// Count timestamps from `epoch_ms` (Unix milliseconds) instead of the Unix epoch.
    pub fn with_epoch(mut self, epoch_ms: u64) -> Self {
        self.epoch_ms = epoch_ms;
        self
    }

    pub fn region(&self) -> u64 {
        self.region
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn epoch_ms(&self) -> u64 {
        self.epoch_ms
    }

    /// Issue the next identifier.
    ///
    /// Fails with [`TxnError::ClockRegressed`] when the clock reads earlier
    /// than the last issued id; nothing is retried here. When the 12-bit
    /// sequence is exhausted within one millisecond the call spins until the
    /// clock ticks forward.
    pub fn next_id(&self) -> Result<RecordId> {
        let mut state = self.state.lock()?;
        let mut timestamp = self.current_timestamp()?;
        let last_timestamp = state.last_timestamp;

        // State is only written once the id is known to be valid, so a failed
        // call consumes nothing.
        let sequence = match last_timestamp {
            Some(last) if timestamp < last => {
                error!(
                    last_timestamp = last,
                    observed = timestamp,
                    "clock moved backwards, refusing to issue id"
                );
                return Err(TxnError::ClockRegressed {
                    last,
                    now: timestamp,
                });
            }
            Some(last) if timestamp == last => {
                let next = (state.sequence + 1) & SEQUENCE_MASK;
                if next == 0 {
                    debug!(timestamp = last, "sequence exhausted, waiting for next millisecond");
                    timestamp = self.wait_next_millis(last)?;
                }
                next
            }
            _ => 0,
        };

        if timestamp > MAX_TIMESTAMP {
            return Err(TxnError::TimestampOverflow(timestamp));
        }

        state.last_timestamp = Some(timestamp);
        state.sequence = sequence;

        Ok(IdParts {
            timestamp,
            region: self.region,
            instance: self.instance,
            sequence,
        }
        .compose())
    }

    /// Split an id into its fields.
    pub fn decompose(&self, id: RecordId) -> IdParts {
        IdParts::decompose(id)
    }

    /// Unix milliseconds at which `id` was issued.
    pub fn issued_at_millis(&self, id: RecordId) -> u64 {
        IdParts::decompose(id).timestamp + self.epoch_ms
    }

    fn current_timestamp(&self) -> Result<u64> {
        let now = self.clock.now_millis();
        now.checked_sub(self.epoch_ms)
            .ok_or(TxnError::ClockRegressed {
                last: self.epoch_ms,
                now,
            })
    }

    /// Spin until the clock reads strictly after `last`.
    fn wait_next_millis(&self, last: u64) -> Result<u64> {
        loop {
            let now = self.current_timestamp()?;
            if now > last {
                return Ok(now);
            }
            std::thread::yield_now();
        }
    }
}

impl std::fmt::Debug for SnowflakeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("region", &self.region)
            .field("instance", &self.instance)
            .field("epoch_ms", &self.epoch_ms)
            .finish()
    }
}
