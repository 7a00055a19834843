//! Typed accessors over the persisted keys

use serde::de::DeserializeOwned;

use super::{keys, KeyValueStore};
use crate::error::{Error, Result};
use crate::models::{Quote, SyncConflict};

/// Typed view of quoteday's local state
#[derive(Debug)]
pub struct LocalState<K> {
    store: K,
}

impl<K: KeyValueStore> LocalState<K> {
    pub const fn new(store: K) -> Self {
        Self { store }
    }

    /// Underlying key-value store
    pub const fn store(&self) -> &K {
        &self.store
    }

    /// Persisted quotes, `None` when nothing was ever saved
    pub fn load_quotes(&self) -> Result<Option<Vec<Quote>>> {
        self.get_json(keys::QUOTES)
    }

    pub fn save_quotes(&self, quotes: &[Quote]) -> Result<()> {
        self.set_json(keys::QUOTES, &quotes)
    }

    /// Last successful sync (Unix ms), 0 when never synced
    pub fn last_sync(&self) -> Result<i64> {
        match self.store.get(keys::LAST_SYNC)? {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::Storage(format!("invalid {} value '{raw}'", keys::LAST_SYNC))
            }),
            None => Ok(0),
        }
    }

    pub fn set_last_sync(&self, timestamp: i64) -> Result<()> {
        self.store.set(keys::LAST_SYNC, &timestamp.to_string())
    }

    /// Pending conflicts, empty when none were saved
    pub fn conflicts(&self) -> Result<Vec<SyncConflict>> {
        Ok(self.get_json(keys::SYNC_CONFLICTS)?.unwrap_or_default())
    }

    pub fn save_conflicts(&self, conflicts: &[SyncConflict]) -> Result<()> {
        self.set_json(keys::SYNC_CONFLICTS, &conflicts)
    }

    pub fn last_category(&self) -> Result<Option<String>> {
        self.store.get(keys::LAST_CATEGORY)
    }

    pub fn set_last_category(&self, category: &str) -> Result<()> {
        self.store.set(keys::LAST_CATEGORY, category)
    }

    pub fn last_viewed_quote(&self) -> Result<Option<String>> {
        self.store.get(keys::LAST_VIEWED_QUOTE)
    }

    pub fn set_last_viewed_quote(&self, text: &str) -> Result<()> {
        self.store.set(keys::LAST_VIEWED_QUOTE, text)
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|error| Error::Storage(format!("invalid {key} value: {error}")))
    }

    fn set_json<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        self.store.set(key, &serialized)
    }
}
