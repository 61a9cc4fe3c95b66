//! Bounded, newest-first conversion history.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::convert::ConversionResult;
use crate::currency::CurrencyCode;

const STORAGE_KEY: &str = "conversionHistory";

/// One recorded conversion. Field names match the persisted JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub amount: f64,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub converted_amount: f64,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    fn from_result(result: &ConversionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: result.amount,
            from_currency: result.from,
            to_currency: result.to,
            converted_amount: result.converted_amount,
            rate: result.rate,
            timestamp: result.computed_at,
        }
    }
}

/// Newest-first history, capped at [`HistoryStore::MAX_ENTRIES`]. The whole
/// sequence is persisted on every mutation.
pub struct HistoryStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub const MAX_ENTRIES: usize = 50;

    /// Opens the store, reconstructing state from durable storage. Absent or
    /// corrupt persisted data falls back to an empty history.
    pub fn open(keyspace: &Keyspace) -> Result<Self> {
        let partition = keyspace
            .open_partition("history", PartitionCreateOptions::default())
            .context("Failed to open history partition")?;
        let entries = load(&partition);
        Ok(Self {
            keyspace: keyspace.clone(),
            partition,
            entries,
        })
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Prepends an entry for the result, evicting the oldest past the cap.
    pub fn record(&mut self, result: &ConversionResult) -> Result<()> {
        self.entries.insert(0, HistoryEntry::from_result(result));
        self.entries.truncate(Self::MAX_ENTRIES);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.entries)?;
        self.partition
            .insert(STORAGE_KEY, bytes)
            .context("Failed to persist conversion history")?;
        self.keyspace
            .persist(fjall::PersistMode::SyncAll)
            .context("Failed to sync conversion history")
    }
}

fn load(partition: &PartitionHandle) -> Vec<HistoryEntry> {
    let Ok(Some(bytes)) = partition.get(STORAGE_KEY) else {
        return Vec::new();
    };
    match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Discarding corrupt conversion history: {}", e);
            Vec::new()
        }
    }
}
