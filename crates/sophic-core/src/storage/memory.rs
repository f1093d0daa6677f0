//! In-process raw storage.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, SophicError};
use crate::storage::traits::RawStorage;

/// Keeps blobs in a map; each write replaces the whole value under the lock.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_blobs(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.blobs
            .lock()
            .map_err(|_| SophicError::Storage("Memory storage poisoned".to_string()))
    }
}

impl RawStorage for MemoryStorage {
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock_blobs()?.get(key).cloned())
    }

    fn write_bytes_atomic(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.lock_blobs()?.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
