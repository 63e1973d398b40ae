// ============================================================================
// txrecords Library
// ============================================================================
//
// Core of a transaction-record service:
// - `idgen`: monotonic 64-bit identifier generator
// - `dedup`: time-windowed duplicate-submission guard
// - `storage`: concurrent record store with pagination
// - `facade`: the create/read/update/delete/list service wiring them together
//
// ============================================================================

pub mod config;
pub mod core;
pub mod dedup;
pub mod facade;
pub mod idgen;
pub mod model;
pub mod storage;

// Re-export main types for convenience
pub use config::ServiceConfig;
pub use core::{Clock, ManualClock, RecordId, Result, SystemClock, TxnError};
pub use dedup::{DedupGuard, DedupStats, LruSeenCache, SeenCache};
pub use facade::TransactionService;
pub use idgen::{IdParts, SnowflakeGenerator};
pub use model::{
    TransactionRecord, TransactionRequest, TransactionResponse, TransactionStatus,
    TransactionType,
};
pub use storage::{InMemoryRecordStore, RecordStore};
