use crate::core::{RecordId, Result};
use crate::model::TransactionRecord;

/// Record store trait - allows pluggable storage backends
///
/// Implementations must be safe to share between threads without external
/// locking. No multi-key atomicity is promised.
pub trait RecordStore: Send + Sync {
    /// Insert or overwrite the record at `record.id`
    fn save(&self, record: TransactionRecord) -> Result<TransactionRecord>;

    /// Same storage semantics as `save`; callers check existence first
    fn update(&self, record: TransactionRecord) -> Result<TransactionRecord>;

    /// Look up one record
    fn find_by_id(&self, id: RecordId) -> Result<Option<TransactionRecord>>;

    /// Records `[page * size, page * size + size)`, clamped to the store size.
    ///
    /// `page` is 0-indexed. Out-of-range pages and `size == 0` give an empty
    /// vector, never an error.
    fn find_page(&self, page: usize, size: usize) -> Result<Vec<TransactionRecord>>;

    /// Remove a record; returns whether one was present
    fn delete(&self, id: RecordId) -> Result<bool>;

    /// Check if a record exists
    fn exists_by_id(&self, id: RecordId) -> Result<bool>;

    /// Number of stored records
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
