use super::RecordStore;
use crate::core::{RecordId, Result};
use crate::model::TransactionRecord;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Records keyed by id under one read-write lock.
///
/// Iteration follows id order, which for generated ids is creation order, so
/// pages are deterministic for a given set of records. Each `find_page` call
/// reads one consistent snapshot; writes between calls may shift later pages.
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<RecordId, TransactionRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn upsert(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        let mut records = self.records.write()?;
        records.insert(record.id, record.clone());
        Ok(record)
    }
}

impl RecordStore for InMemoryRecordStore {
    fn save(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        self.upsert(record)
    }

    fn update(&self, record: TransactionRecord) -> Result<TransactionRecord> {
        self.upsert(record)
    }

    fn find_by_id(&self, id: RecordId) -> Result<Option<TransactionRecord>> {
        let records = self.records.read()?;
        Ok(records.get(&id).cloned())
    }

    fn find_page(&self, page: usize, size: usize) -> Result<Vec<TransactionRecord>> {
        let records = self.records.read()?;
        let from = page.saturating_mul(size).min(records.len());
        Ok(records.values().skip(from).take(size).cloned().collect())
    }

    fn delete(&self, id: RecordId) -> Result<bool> {
        let mut records = self.records.write()?;
        Ok(records.remove(&id).is_some())
    }

    fn exists_by_id(&self, id: RecordId) -> Result<bool> {
        let records = self.records.read()?;
        Ok(records.contains_key(&id))
    }

    fn len(&self) -> Result<usize> {
        let records = self.records.read()?;
        Ok(records.len())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}
