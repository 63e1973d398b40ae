// ============================================================================
// Transaction Service
// ============================================================================
//
// Create/read/update/delete/list over the record store.
//
// Creation runs: dedup check-and-mark -> id generation -> store write. The
// three steps are not one atomic unit. Concurrent identical submissions are
// still rejected because the dedup step itself is atomic; a fingerprint
// marked by a request whose id generation then fails stays marked until its
// window ends.
//
// ============================================================================

use crate::config::ServiceConfig;
use crate::core::{Clock, RecordId, Result, SystemClock, TxnError};
use crate::dedup::{DedupGuard, DedupStats};
use crate::idgen::SnowflakeGenerator;
use crate::model::{TransactionRequest, TransactionResponse};
use crate::storage::{InMemoryRecordStore, RecordStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct TransactionService {
    ids: Arc<SnowflakeGenerator>,
    dedup: Arc<DedupGuard>,
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl TransactionService {
    pub fn new(
        ids: Arc<SnowflakeGenerator>,
        dedup: Arc<DedupGuard>,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ids,
            dedup,
            store,
            clock,
        }
    }

    /// Wire a service on the system clock and an in-memory store.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    /// Wire a service whose generator, dedup window, and timestamps all read `clock`.
    pub fn from_config_with_clock(config: &ServiceConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let ids =
            SnowflakeGenerator::with_clock(config.region_id, config.instance_id, clock.clone())?
                .with_epoch(config.epoch_ms);
        let dedup = DedupGuard::with_clock(
            config.dedup_window,
            config.dedup_max_entries,
            config.dedup_shards,
            clock.clone(),
        )?;

        info!(
            region_id = config.region_id,
            instance_id = config.instance_id,
            dedup_window_secs = config.dedup_window.as_secs(),
            "transaction service configured"
        );

        Ok(Self::new(
            Arc::new(ids),
            Arc::new(dedup),
            Arc::new(InMemoryRecordStore::new()),
            clock,
        ))
    }

    /// Store a new transaction unless an identical one arrived within the dedup window.
    pub fn create(&self, request: TransactionRequest) -> Result<TransactionResponse> {
        if self.dedup.check_and_mark(&request.fingerprint()) {
            warn!(request = %request.summary(), "duplicated transaction request");
            return Err(TxnError::DuplicateSubmission(request.summary()));
        }

        let id = self.ids.next_id()?;
        let record = request.into_record(id, self.now());
        let saved = self.store.save(record)?;

        info!(
            id = %saved.id,
            amount_minor = saved.amount_minor,
            currency = %saved.currency,
            "saved transaction"
        );
        Ok(TransactionResponse::from(saved))
    }

    /// Replace every business field of an existing transaction, keeping its id.
    ///
    /// Updates are not dedup-checked.
    pub fn update(&self, id: RecordId, request: TransactionRequest) -> Result<TransactionResponse> {
        if !self.store.exists_by_id(id)? {
            warn!(id = %id, request = %request.summary(), "transaction to update not found");
            return Err(TxnError::NotFound(id));
        }

        let record = request.into_record(id, self.now());
        let updated = self.store.update(record)?;

        info!(id = %id, "updated transaction");
        Ok(TransactionResponse::from(updated))
    }

    pub fn get(&self, id: RecordId) -> Result<TransactionResponse> {
        match self.store.find_by_id(id)? {
            Some(record) => Ok(TransactionResponse::from(record)),
            None => {
                warn!(id = %id, "transaction not found");
                Err(TxnError::NotFound(id))
            }
        }
    }

    pub fn delete(&self, id: RecordId) -> Result<()> {
        if !self.store.delete(id)? {
            warn!(id = %id, "transaction to delete not found");
            return Err(TxnError::NotFound(id));
        }

        info!(id = %id, "deleted transaction");
        Ok(())
    }

    /// One page of transactions in id order. `page` starts at 1.
    pub fn list(&self, page: usize, size: usize) -> Result<Vec<TransactionResponse>> {
        if page == 0 {
            return Err(TxnError::InvalidPaging("page must be >= 1".to_string()));
        }
        if size == 0 {
            return Err(TxnError::InvalidPaging("size must be >= 1".to_string()));
        }

        let records = self.store.find_page(page - 1, size)?;
        Ok(records.into_iter().map(TransactionResponse::from).collect())
    }

    pub fn count(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn dedup_stats(&self) -> DedupStats {
        self.dedup.stats()
    }

    pub fn id_generator(&self) -> &Arc<SnowflakeGenerator> {
        &self.ids
    }

    fn now(&self) -> DateTime<Utc> {
        i64::try_from(self.clock.now_millis())
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now)
    }
}
