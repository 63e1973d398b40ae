use crate::core::{Result, TxnError};
use crate::dedup::DEFAULT_SHARDS;
use crate::idgen::{MAX_INSTANCE, MAX_REGION};
use anyhow::Context;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration
///
/// Identity values must fit the identifier layout; they are checked by
/// [`ServiceConfig::validate`] at startup, never per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Generator region (datacenter) id, 0..=31
    pub region_id: u64,

    /// Generator instance (machine) id, 0..=31
    pub instance_id: u64,

    /// Unix milliseconds that identifier timestamps count from
    pub epoch_ms: u64,

    /// How long a submission fingerprint counts as a duplicate
    pub dedup_window: Duration,

    /// Maximum fingerprints held before least recently used ones are evicted
    pub dedup_max_entries: usize,

    /// Independently locked dedup cache shards
    pub dedup_shards: usize,

    /// Page size used when a caller does not pick one
    pub default_page_size: usize,
}

impl ServiceConfig {
    pub fn new(region_id: u64, instance_id: u64) -> Self {
        Self {
            region_id,
            instance_id,
            epoch_ms: 0,
            dedup_window: Duration::from_secs(60),
            dedup_max_entries: 100_000,
            dedup_shards: DEFAULT_SHARDS,
            default_page_size: 10,
        }
    }

    pub fn epoch_ms(mut self, epoch_ms: u64) -> Self {
        self.epoch_ms = epoch_ms;
        self
    }

    pub fn dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    pub fn dedup_max_entries(mut self, max: usize) -> Self {
        self.dedup_max_entries = max;
        self
    }

    pub fn dedup_shards(mut self, shards: usize) -> Self {
        self.dedup_shards = shards;
        self
    }

    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Load from process environment, reading a `.env` file first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup, falling back to defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            region_id: parse_or(&lookup, "SNOWFLAKE_REGION_ID", defaults.region_id)?,
            instance_id: parse_or(&lookup, "SNOWFLAKE_INSTANCE_ID", defaults.instance_id)?,
            epoch_ms: parse_or(&lookup, "SNOWFLAKE_EPOCH_MS", defaults.epoch_ms)?,
            dedup_window: Duration::from_secs(parse_or(
                &lookup,
                "DEDUP_WINDOW_SECS",
                defaults.dedup_window.as_secs(),
            )?),
            dedup_max_entries: parse_or(&lookup, "DEDUP_MAX_ENTRIES", defaults.dedup_max_entries)?,
            dedup_shards: parse_or(&lookup, "DEDUP_SHARDS", defaults.dedup_shards)?,
            default_page_size: parse_or(&lookup, "DEFAULT_PAGE_SIZE", defaults.default_page_size)?,
        };

        config
            .validate()
            .context("invalid service configuration")?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.region_id > MAX_REGION {
            return Err(TxnError::InvalidConfig(format!(
                "region_id must be <= {}, got {}",
                MAX_REGION, self.region_id
            )));
        }

        if self.instance_id > MAX_INSTANCE {
            return Err(TxnError::InvalidConfig(format!(
                "instance_id must be <= {}, got {}",
                MAX_INSTANCE, self.instance_id
            )));
        }

        if self.dedup_window.is_zero() {
            return Err(TxnError::InvalidConfig(
                "dedup_window must be > 0".to_string(),
            ));
        }

        if self.dedup_max_entries == 0 {
            return Err(TxnError::InvalidConfig(
                "dedup_max_entries must be > 0".to_string(),
            ));
        }

        if self.dedup_shards == 0 {
            return Err(TxnError::InvalidConfig(
                "dedup_shards must be > 0".to_string(),
            ));
        }

        if self.default_page_size == 0 {
            return Err(TxnError::InvalidConfig(
                "default_page_size must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
