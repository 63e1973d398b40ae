// ============================================================================
// Identifier Bit Layout
// ============================================================================
//
//   63      22 21     17 16       12 11        0
//  +----------+---------+-----------+-----------+
//  | time (41)| region 5| instance 5| sequence 12|
//  +----------+---------+-----------+-----------+
//
// The top bit stays clear so ids remain positive as signed 64-bit integers.
//
// ============================================================================

use crate::core::RecordId;

pub const TIMESTAMP_BITS: u32 = 41;
pub const REGION_BITS: u32 = 5;
pub const INSTANCE_BITS: u32 = 5;
pub const SEQUENCE_BITS: u32 = 12;

pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;
pub const MAX_REGION: u64 = (1 << REGION_BITS) - 1;
pub const MAX_INSTANCE: u64 = (1 << INSTANCE_BITS) - 1;
pub const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

const INSTANCE_SHIFT: u32 = SEQUENCE_BITS;
const REGION_SHIFT: u32 = SEQUENCE_BITS + INSTANCE_BITS;
const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + INSTANCE_BITS + REGION_BITS;

/// The four fields packed into an identifier.
///
/// `timestamp` is relative to the generator's epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParts {
    pub timestamp: u64,
    pub region: u64,
    pub instance: u64,
    pub sequence: u64,
}

impl IdParts {
    /// Pack the fields high-to-low. Callers keep each field within its width.
    pub fn compose(&self) -> RecordId {
        debug_assert!(self.timestamp <= MAX_TIMESTAMP);
        debug_assert!(self.region <= MAX_REGION);
        debug_assert!(self.instance <= MAX_INSTANCE);
        debug_assert!(self.sequence <= SEQUENCE_MASK);

        RecordId(
            (self.timestamp << TIMESTAMP_SHIFT)
                | (self.region << REGION_SHIFT)
                | (self.instance << INSTANCE_SHIFT)
                | self.sequence,
        )
    }

    pub fn decompose(id: RecordId) -> Self {
        let raw = id.as_u64();
        Self {
            timestamp: raw >> TIMESTAMP_SHIFT,
            region: (raw >> REGION_SHIFT) & MAX_REGION,
            instance: (raw >> INSTANCE_SHIFT) & MAX_INSTANCE,
            sequence: raw & SEQUENCE_MASK,
        }
    }
}
