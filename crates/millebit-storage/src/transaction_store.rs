//! Simulated payment history persistence
//!
//! Records produced by the payment simulator, stored as one JSON array in
//! the same camelCase shape the card collection uses.

use crate::kv::keys;
use crate::{Error, KvStore, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// How a simulated payment was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Simulated NFC tap.
    Contactless,
    /// Simulated QR code scan.
    QrCode,
}

impl PaymentMethod {
    /// Display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Contactless => "Contactless",
            PaymentMethod::QrCode => "QR Code",
        }
    }
}

/// One completed simulated payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Unique record id.
    pub id: String,
    /// Human-facing transaction reference, e.g. `TXN00123456`.
    pub reference: String,
    /// Id of the card that paid.
    pub card_id: String,
    /// Last four digits of the paying card, denormalized for display.
    pub card_last_four: String,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Optional free-form description.
    pub description: Option<String>,
    /// How the payment was initiated.
    pub method: PaymentMethod,
    /// Completion timestamp in milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Durable list of simulated payments.
#[derive(Clone)]
pub struct TransactionStore {
    kv: KvStore,
}

impl TransactionStore {
    /// Create a transaction store over the shared key-value store.
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Append a record atomically.
    pub fn append(&self, record: PaymentRecord) -> Result<()> {
        self.kv.update(keys::TRANSACTIONS, |current| {
            let mut records = decode_records(current)?;
            records.push(record);
            let raw = serde_json::to_string(&records)?;
            Ok((Some(raw), ()))
        })?;
        Ok(())
    }

    /// All stored records, most recent first.
    pub fn history(&self) -> Result<Vec<PaymentRecord>> {
        let mut records = decode_records(self.kv.get_raw(keys::TRANSACTIONS)?)?;
        records.sort_by_key(|record| Reverse(record.created_at));
        Ok(records)
    }

    /// Remove the entire history.
    pub fn clear(&self) -> Result<()> {
        self.kv.delete(keys::TRANSACTIONS)?;
        Ok(())
    }
}

fn decode_records(raw: Option<String>) -> Result<Vec<PaymentRecord>> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(error = %e, "Corrupted payment history");
            Error::Corrupted {
                key: keys::TRANSACTIONS.to_string(),
                reason: e.to_string(),
            }
        }),
    }
}
