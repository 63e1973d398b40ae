use super::types::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TxnError {
    #[error("Clock moved backwards: last timestamp {last}ms, observed {now}ms")]
    ClockRegressed { last: u64, now: u64 },

    #[error("Timestamp {0}ms does not fit in the identifier layout")]
    TimestampOverflow(u64),

    #[error("Transaction duplicated with {0}")]
    DuplicateSubmission(String),

    #[error("Transaction not found with id: {0}")]
    NotFound(RecordId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid paging: {0}")]
    InvalidPaging(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl TxnError {
    /// Conditions the submitting client can act on (resubmit, wait, fix the id).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSubmission(_) | Self::NotFound(_) | Self::InvalidPaging(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TxnError>;

impl<T> From<std::sync::PoisonError<T>> for TxnError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
