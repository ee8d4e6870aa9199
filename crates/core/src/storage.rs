//! The persisted key-value slot the cart mirrors into.
//!
//! The cart owns exactly one durable slot holding the serialized line items.
//! Implementations decide where that slot lives (a JSON file in the
//! storefront binary, memory in tests). Callers never see slot failures:
//! the [`CartStore`](crate::cart::CartStore) swallows every error here and
//! keeps its in-memory state authoritative.

use std::sync::Mutex;

use thiserror::Error;

/// Errors raised by a [`CartStorage`] implementation.
///
/// These never escape the cart store; they exist so implementations can
/// report what went wrong for logging.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying medium could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single durable key-value slot.
///
/// `read` distinguishes "slot absent" (`Ok(None)`) from "slot unreadable"
/// (`Err`), but the cart store treats both as an empty cart.
pub trait CartStorage: Send + Sync {
    /// Read the raw payload, if the slot exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the medium cannot be read.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot with a new payload.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the medium cannot be written.
    fn write(&self, payload: &str) -> Result<(), StorageError>;

    /// Delete the slot entirely. Deleting an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the medium cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory slot for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    payload: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-seeded with a payload.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(payload.into())),
        }
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        self.payload
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| StorageError::Unavailable("poisoned lock".to_string()))
    }

    fn write(&self, payload: &str) -> Result<(), StorageError> {
        self.payload
            .lock()
            .map(|mut guard| *guard = Some(payload.to_string()))
            .map_err(|_| StorageError::Unavailable("poisoned lock".to_string()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.payload
            .lock()
            .map(|mut guard| *guard = None)
            .map_err(|_| StorageError::Unavailable("poisoned lock".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_starts_absent() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read().unwrap(), None);
    }

    #[test]
    fn test_memory_storage_write_then_read() {
        let storage = MemoryStorage::new();
        storage.write("[]").unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_storage_clear_removes_slot() {
        let storage = MemoryStorage::with_payload("[]");
        storage.clear().unwrap();
        assert_eq!(storage.read().unwrap(), None);
        // Clearing an absent slot is fine too.
        storage.clear().unwrap();
    }
}
