//! Append-only transfer history with JSON persistence.
//!
//! One fixed file holds the whole serialized sequence; every append
//! rewrites it (overwrite semantics, not incremental). Records are never
//! mutated or removed once appended, and the in-memory and persisted
//! sequences stay synchronized after every append. Loading fails soft:
//! absent or unreadable data yields an empty log.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, TxHash};

use crate::error::{WalletError, WalletResult};

/// One confirmed transfer.
///
/// Serialized field names match the original storage format and must stay
/// stable across releases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Submitted-transaction hash.
    pub tx_hash: String,
    /// Recipient address.
    pub to: String,
    /// Amount as entered, in display units.
    pub amount: String,
    /// Record creation time at confirmation, epoch milliseconds.
    pub timestamp: u64,
}

impl TransferRecord {
    pub fn new(hash: TxHash, to: Address, amount: &str) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            tx_hash: hash.to_string(),
            to: to.to_string(),
            amount: amount.to_string(),
            timestamp,
        }
    }
}

/// Insertion-ordered transfer history backed by one JSON file.
pub struct TransactionLog {
    records: Vec<TransferRecord>,
    path: PathBuf,
}

impl TransactionLog {
    /// Load the persisted sequence, treating absent or unreadable data as
    /// empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records: Vec<TransferRecord> = match File::open(&path) {
            Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "discarding unreadable transfer history"
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        if !records.is_empty() {
            tracing::info!(count = records.len(), "loaded transfer history");
        }
        Self { records, path }
    }

    /// Append a record and rewrite the whole persisted sequence.
    pub fn append(&mut self, record: TransferRecord) -> WalletResult<()> {
        self.records.push(record);
        self.save()
    }

    fn save(&self) -> WalletResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WalletError::History(e.to_string()))?;
        }
        let file = File::create(&self.path).map_err(|e| WalletError::History(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.records)
            .map_err(|e| WalletError::History(e.to_string()))?;
        writer.flush().map_err(|e| WalletError::History(e.to_string()))?;
        Ok(())
    }

    /// Records in insertion order, most recent last.
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    /// Records most recent first, the order the history view renders in.
    pub fn iter_recent(&self) -> impl Iterator<Item = &TransferRecord> {
        self.records.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
