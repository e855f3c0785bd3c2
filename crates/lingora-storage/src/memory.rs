//! In-memory storage backend.

use crate::{ExtensionStorage, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process key/value storage.
///
/// Backs the extension's private storage domain in this process; also the
/// backend tests run against.
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtensionStorage for MemoryStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| crate::StorageError::Backend(e.to_string()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let data = self
            .data
            .lock()
            .map_err(|e| crate::StorageError::Backend(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| crate::StorageError::Backend(e.to_string()))?;
        Ok(data.remove(key).is_some())
    }
}
