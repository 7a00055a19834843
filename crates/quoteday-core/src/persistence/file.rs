//! File-backed key-value store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// `KeyValueStore` persisted as a single JSON object file
///
/// Reads go to the file every time. A `set` re-reads the file, replaces the
/// one key and writes the map back through a temporary sibling file followed
/// by a rename, so keys written by other processes in the meantime survive
/// and a crash never leaves a half-written state file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed
    ///
    /// A file that is not a JSON string map is moved aside to
    /// `<name>.corrupt-<unix ms>` and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if let Err(error) = serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                tracing::warn!(
                    "State file {} is not valid ({}); starting from empty state",
                    path.display(),
                    error
                );
                Self::quarantine_corrupted_file(&path)?;
            }
        }

        tracing::debug!("Opened state file {}", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn quarantine_corrupted_file(path: &Path) -> Result<()> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let file_name = path
            .file_name()
            .map_or_else(|| "state".into(), |name| name.to_string_lossy());
        let backup_path = path.with_file_name(format!("{file_name}.corrupt-{timestamp}"));
        std::fs::rename(path, &backup_path)?;
        tracing::warn!(
            "Moved corrupted state file from {} to {}",
            path.display(),
            backup_path.display()
        );
        Ok(())
    }

    fn read_values(&self) -> Result<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(error) => return Err(error.into()),
        };
        serde_json::from_str(&raw).map_err(|error| {
            Error::Storage(format!(
                "state file {} is not valid: {error}",
                self.path.display()
            ))
        })
    }

    fn write_file(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let serialized = serde_json::to_string_pretty(values)?;
        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "state".into(), |name| name.to_string_lossy());
        let temp_path = self
            .path
            .with_file_name(format!("{file_name}.{}.tmp", std::process::id()));
        std::fs::write(&temp_path, serialized)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_values()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Storage("state file lock poisoned".into()))?;
        let mut values = self.read_values()?;
        values.insert(key.to_string(), value.to_string());
        self.write_file(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set("lastSync", "10").unwrap();

        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("lastSelectedCategory", "wisdom").unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("lastSelectedCategory").unwrap().as_deref(),
            Some("wisdom")
        );
        assert_eq!(reopened.get("quotes").unwrap(), None);
    }

    #[test]
    fn test_corrupted_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("quotes").unwrap(), None);

        let backups = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("state.json.corrupt-")
            })
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_set_keeps_keys_written_by_another_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let first = JsonFileStore::open(&path).unwrap();
        let second = JsonFileStore::open(&path).unwrap();

        second.set("lastSelectedCategory", "Wisdom").unwrap();
        first.set("lastSync", "42").unwrap();

        assert_eq!(
            first.get("lastSelectedCategory").unwrap().as_deref(),
            Some("Wisdom")
        );
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("lastSync").unwrap().as_deref(), Some("42"));
        assert_eq!(
            reopened.get("lastSelectedCategory").unwrap().as_deref(),
            Some("Wisdom")
        );
    }

    #[test]
    fn test_file_corrupted_after_open_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::open(&path).unwrap();
        std::fs::write(&path, "{broken").unwrap();

        assert!(matches!(store.get("quotes"), Err(Error::Storage(_))));
        assert!(matches!(store.set("quotes", "[]"), Err(Error::Storage(_))));
    }
}
