//! Persistent key-value namespaces holding millisecond values.
//!
//! [`JsonFileStore`] keeps one namespace per JSON file and writes it through on
//! every change; [`MemoryStore`] backs tests and ephemeral sessions.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tvreel_common::{Error, Result};

/// Flat key-value namespace of non-negative integers.
///
/// Writes are last-writer-wins with no versioning. Implementations take `&self`
/// so a single handle can be shared between the host and the playback screen.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<u64>>;

    /// Insert or overwrite `key`.
    fn set(&self, key: &str, value: u64) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory namespace. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.entries.read().get(key).copied())
    }

    fn set(&self, key: &str, value: u64) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Namespace persisted as a single JSON object on disk.
///
/// The whole document is loaded at open and rewritten atomically (temp file in
/// the same directory, then rename) after every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, u64>>,
}

impl JsonFileStore {
    /// Open the namespace file at `path`, creating its directory if needed.
    ///
    /// A missing file is an empty namespace. A file that is not a JSON object
    /// of integers is rejected rather than silently overwritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    Error::storage(format!("Corrupt namespace file {:?}: {}", path, e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened namespace {:?} with {} entries", path, entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_to_file(&self, entries: &BTreeMap<String, u64>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let json = serde_json::to_string_pretty(entries)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .map_err(|e| Error::storage(format!("Failed to persist {:?}: {}", self.path, e)))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.entries.read().get(key).copied())
    }

    // The in-memory map only changes once the new document is on disk.
    fn set(&self, key: &str, value: u64) -> Result<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.save_to_file(&next)?;
        *entries = next;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.save_to_file(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_basics() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("pos_1").unwrap(), None);

        store.set("pos_1", 42_000).unwrap();
        store.set("pos_1", 43_000).unwrap();
        assert_eq!(store.get("pos_1").unwrap(), Some(43_000));
        assert_eq!(store.len(), 1);

        store.delete("pos_1").unwrap();
        store.delete("pos_1").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume_positions.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set("pos_-1", 42_000).unwrap();
            store.set("pos_7", 1_500).unwrap();
            store.delete("pos_7").unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("pos_-1").unwrap(), Some(42_000));
        assert_eq!(store.get("pos_7").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/data/resume_positions.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        store.set("pos_3", 9_000).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_store_delete_absent_does_not_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume_positions.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.delete("pos_9").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume_positions.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_file_store_failed_write_keeps_previous_state() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let path = data_dir.join("resume_positions.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("pos_1", 42_000).unwrap();

        // Replace the directory with a plain file so every write fails.
        std::fs::remove_dir_all(&data_dir).unwrap();
        std::fs::write(&data_dir, "not a directory").unwrap();

        assert!(store.set("pos_1", 50_000).is_err());
        assert!(store.set("pos_2", 7_000).is_err());
        assert!(store.delete("pos_1").is_err());

        assert_eq!(store.get("pos_1").unwrap(), Some(42_000));
        assert_eq!(store.get("pos_2").unwrap(), None);
    }

    #[test]
    fn test_file_store_empty_file_is_empty_namespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resume_positions.json");
        std::fs::write(&path, "").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }
}
