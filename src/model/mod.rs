pub mod request;
pub mod transaction;

pub use request::{TransactionRequest, TransactionResponse};
pub use transaction::{TransactionRecord, TransactionStatus, TransactionType};
