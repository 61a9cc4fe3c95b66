//! Favorite conversion pairs with set semantics.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::CurrencyCode;

const STORAGE_KEY: &str = "favoriteConversions";

/// A favorited pair, keyed by `"FROM-TO"`. Field names match the persisted
/// JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub key: String,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub from_name: String,
    pub to_name: String,
    pub timestamp: DateTime<Utc>,
}

pub fn pair_key(from: CurrencyCode, to: CurrencyCode) -> String {
    format!("{from}-{to}")
}

/// Set of favorite pairs, persisted wholesale on every mutation.
pub struct FavoritesStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
    entries: Vec<FavoriteEntry>,
}

impl FavoritesStore {
    /// Opens the store; absent or corrupt persisted data falls back to an
    /// empty set.
    pub fn open(keyspace: &Keyspace) -> Result<Self> {
        let partition = keyspace
            .open_partition("favorites", PartitionCreateOptions::default())
            .context("Failed to open favorites partition")?;
        let entries = load(&partition);
        Ok(Self {
            keyspace: keyspace.clone(),
            partition,
            entries,
        })
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn is_favorite(&self, from: CurrencyCode, to: CurrencyCode) -> bool {
        let key = pair_key(from, to);
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Adds the pair if absent, removes it if present. Returns true when the
    /// pair was added.
    pub fn toggle(&mut self, from: CurrencyCode, to: CurrencyCode) -> Result<bool> {
        let key = pair_key(from, to);
        let added = match self.entries.iter().position(|entry| entry.key == key) {
            Some(index) => {
                self.entries.remove(index);
                false
            }
            None => {
                self.entries.push(FavoriteEntry {
                    key,
                    from_currency: from,
                    to_currency: to,
                    from_name: from.name().to_string(),
                    to_name: to.name().to_string(),
                    timestamp: Utc::now(),
                });
                true
            }
        };
        self.persist()?;
        Ok(added)
    }

    /// Removes an entry by its pair key. Returns true when something was
    /// removed.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key != key);
        let removed = self.entries.len() != before;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.entries)?;
        self.partition
            .insert(STORAGE_KEY, bytes)
            .context("Failed to persist favorite conversions")?;
        self.keyspace
            .persist(fjall::PersistMode::SyncAll)
            .context("Failed to sync favorite conversions")
    }
}

fn load(partition: &PartitionHandle) -> Vec<FavoriteEntry> {
    let Ok(Some(bytes)) = partition.get(STORAGE_KEY) else {
        return Vec::new();
    };
    match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Discarding corrupt favorites: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &tempfile::TempDir) -> FavoritesStore {
        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        FavoritesStore::open(&keyspace).unwrap()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);

        assert!(store.toggle(CurrencyCode::USD, CurrencyCode::EUR).unwrap());
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].key, "USD-EUR");
        assert_eq!(store.entries()[0].from_name, "US Dollar");
        assert!(store.is_favorite(CurrencyCode::USD, CurrencyCode::EUR));

        // Toggling again restores the original absent state.
        assert!(!store.toggle(CurrencyCode::USD, CurrencyCode::EUR).unwrap());
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_pairs_are_ordered() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);

        store.toggle(CurrencyCode::USD, CurrencyCode::EUR).unwrap();
        assert!(!store.is_favorite(CurrencyCode::EUR, CurrencyCode::USD));

        store.toggle(CurrencyCode::EUR, CurrencyCode::USD).unwrap();
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn test_remove_by_key() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);

        store.toggle(CurrencyCode::USD, CurrencyCode::EUR).unwrap();
        assert!(store.remove("USD-EUR").unwrap());
        assert!(store.entries().is_empty());
        assert!(!store.remove("USD-EUR").unwrap());
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let keyspace = fjall::Config::new(dir.path()).open().unwrap();
            let mut store = FavoritesStore::open(&keyspace).unwrap();
            store.toggle(CurrencyCode::USD, CurrencyCode::EUR).unwrap();
        }

        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        let store = FavoritesStore::open(&keyspace).unwrap();
        assert!(store.is_favorite(CurrencyCode::USD, CurrencyCode::EUR));
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let dir = tempdir().unwrap();
        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        {
            let partition = keyspace
                .open_partition("favorites", PartitionCreateOptions::default())
                .unwrap();
            partition.insert(STORAGE_KEY, b"42").unwrap();
        }

        let store = FavoritesStore::open(&keyspace).unwrap();
        assert!(store.entries().is_empty());
    }
}
