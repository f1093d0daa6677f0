//! Raw storage collaborator interface.
//!
//! The core never touches the filesystem directly; it reads and writes opaque
//! byte blobs by key through a `RawStorage`. Implementations must guarantee
//! atomic replace semantics: a reader sees either the previous blob or the
//! new one, never a partially written value.

use std::sync::Arc;

use crate::error::Result;

/// Byte-blob storage keyed by a flat name.
pub trait RawStorage: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been written under `key` yet.
    ///
    /// # Errors
    ///
    /// Returns `SophicError::Storage` if the backend fails to read, or
    /// `SophicError::InvalidInput` if the key is not acceptable.
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the blob stored under `key` with `bytes`, atomically.
    ///
    /// # Errors
    ///
    /// Returns `SophicError::Storage` if the write fails; the previous blob
    /// must then still be readable unchanged.
    fn write_bytes_atomic(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

impl<T: RawStorage + ?Sized> RawStorage for &T {
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).read_bytes(key)
    }

    fn write_bytes_atomic(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes_atomic(key, bytes)
    }
}

impl<T: RawStorage + ?Sized> RawStorage for Arc<T> {
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).read_bytes(key)
    }

    fn write_bytes_atomic(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes_atomic(key, bytes)
    }
}
