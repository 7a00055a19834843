//! Local persistence layer
//!
//! Durable local state is a flat key-value map of strings, mirroring a
//! browser-style local storage. [`LocalState`] adds typed accessors for the
//! keys quoteday uses.

mod file;
mod local_state;
mod memory;

pub use file::JsonFileStore;
pub use local_state::LocalState;
pub use memory::MemoryStore;

use crate::error::Result;

/// Persisted key names
pub mod keys {
    /// JSON array of quotes
    pub const QUOTES: &str = "quotes";
    /// Last successful sync, Unix ms as a decimal string
    pub const LAST_SYNC: &str = "lastSync";
    /// JSON array of pending conflicts
    pub const SYNC_CONFLICTS: &str = "syncConflicts";
    /// Category chosen in the filter
    pub const LAST_CATEGORY: &str = "lastSelectedCategory";
    /// Text of the most recently shown quote
    pub const LAST_VIEWED_QUOTE: &str = "lastViewedQuote";
}

/// Trait for key-value storage operations
pub trait KeyValueStore {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<K> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
