use super::transaction::{TransactionRecord, TransactionStatus, TransactionType};
use crate::core::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const FINGERPRINT_SEPARATOR: &str = "_";

/// Submission payload for creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub amount_minor: i64,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub sender_account: String,
    pub receiver_account: String,
    #[serde(default)]
    pub beneficiary_name: Option<String>,
    pub channel: String,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub device_fingerprint: Option<String>,
}

impl TransactionRequest {
    /// A pending transfer over the `ONLINE` channel; adjust with the setters below.
    pub fn new(
        sender_account: impl Into<String>,
        receiver_account: impl Into<String>,
        amount_minor: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            amount_minor,
            currency: currency.into(),
            kind: TransactionType::Transfer,
            sender_account: sender_account.into(),
            receiver_account: receiver_account.into(),
            beneficiary_name: None,
            channel: "ONLINE".to_string(),
            status: TransactionStatus::Pending,
            description: None,
            ip_address: None,
            device_fingerprint: None,
        }
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = kind;
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn beneficiary_name(mut self, name: impl Into<String>) -> Self {
        self.beneficiary_name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn client(
        mut self,
        ip_address: impl Into<String>,
        device_fingerprint: impl Into<String>,
    ) -> Self {
        self.ip_address = Some(ip_address.into());
        self.device_fingerprint = Some(device_fingerprint.into());
        self
    }

    /// Fields that make two submissions "the same request", e.g. `A_B_100_USD`.
    pub fn fingerprint(&self) -> String {
        let amount = self.amount_minor.to_string();
        [
            self.sender_account.as_str(),
            self.receiver_account.as_str(),
            amount.as_str(),
            self.currency.as_str(),
        ]
        .join(FINGERPRINT_SEPARATOR)
    }

    /// Short form used in log lines and error messages.
    pub fn summary(&self) -> String {
        format!(
            "TransactionRequest{{sender_account='{}', receiver_account='{}', amount_minor={}, currency='{}'}}",
            self.sender_account, self.receiver_account, self.amount_minor, self.currency
        )
    }

    pub fn into_record(self, id: RecordId, transaction_time: DateTime<Utc>) -> TransactionRecord {
        TransactionRecord {
            id,
            amount_minor: self.amount_minor,
            currency: self.currency,
            kind: self.kind,
            sender_account: self.sender_account,
            receiver_account: self.receiver_account,
            beneficiary_name: self.beneficiary_name,
            channel: self.channel,
            status: self.status,
            description: self.description,
            transaction_time,
            ip_address: self.ip_address,
            device_fingerprint: self.device_fingerprint,
        }
    }
}

/// Client-facing view of a record. Client network details are not echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
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
}

impl From<&TransactionRecord> for TransactionResponse {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            id: record.id,
            amount_minor: record.amount_minor,
            currency: record.currency.clone(),
            kind: record.kind,
            sender_account: record.sender_account.clone(),
            receiver_account: record.receiver_account.clone(),
            beneficiary_name: record.beneficiary_name.clone(),
            channel: record.channel.clone(),
            status: record.status,
            description: record.description.clone(),
            transaction_time: record.transaction_time,
        }
    }
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self::from(&record)
    }
}
