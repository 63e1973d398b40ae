use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored transaction record.
///
/// Produced by [`SnowflakeGenerator`](crate::idgen::SnowflakeGenerator), so the
/// natural ordering of ids follows the order in which they were generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Get the raw 64-bit value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        RecordId(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
