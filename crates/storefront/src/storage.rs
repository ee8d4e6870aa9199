//! File-backed cart slot.
//!
//! The persisted cart is a single JSON document at a configured path. Read,
//! write, and clear map directly onto the filesystem; a missing file is an
//! absent slot, not an error.

use std::io::ErrorKind;
use std::path::PathBuf;

use tmi_store_core::{CartStorage, StorageError};

/// Cart storage backed by one JSON file.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CartStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    fn write(&self, payload: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        }
        std::fs::write(&self.path, payload).map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tmi-store-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_read_missing_file_is_absent_slot() {
        let storage = JsonFileStorage::new(temp_path("missing"));
        assert_eq!(storage.read().unwrap(), None);
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let path = temp_path("roundtrip");
        let storage = JsonFileStorage::new(path.clone());
        storage.write("[{\"quantity\":2}]").unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some("[{\"quantity\":2}]"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_clear_removes_the_slot() {
        let storage = JsonFileStorage::new(temp_path("clear"));
        storage.write("[]").unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.read().unwrap(), None);
        // Clearing an already absent slot succeeds.
        storage.clear().unwrap();
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("tmi-store-nested-{}", std::process::id()));
        let path = dir.join("deep").join("cart.json");
        let storage = JsonFileStorage::new(path);
        storage.write("[]").unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some("[]"));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
