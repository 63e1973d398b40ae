use crate::core::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Transfer,
    Withdrawal,
    Deposit,
    BillPayment,
    CardPayment,
    FeeCharge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Reversed,
}

/// A stored monetary transaction.
///
/// `amount_minor` is in the currency's minor unit (cents for USD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: RecordId,
    pub amount_minor: i64,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub sender_account: String,
    pub receiver_account: String,
    pub beneficiary_name: Option<String>,
    pub channel: String,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub transaction_time: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub device_fingerprint: Option<String>,
}
