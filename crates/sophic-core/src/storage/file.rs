//! Directory-backed raw storage.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SophicError};
use crate::storage::traits::RawStorage;

/// Stores each key as a file directly under a root directory.
///
/// Keys must be plain file names; anything that could address a path outside
/// the root is refused.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `key` to a path under the root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && !key.contains("..")
            && !key.contains(['/', '\\', '\0'])
            && !key.starts_with('.');
        if !valid {
            return Err(SophicError::InvalidInput(format!(
                "Storage key must be a plain file name: {:?}",
                key
            )));
        }
        Ok(self.root.join(key))
    }
}

impl RawStorage for FileStorage {
    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SophicError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                err
            ))),
        }
    }

    fn write_bytes_atomic(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| {
            SophicError::Storage(format!(
                "Failed to create storage directory {}: {}",
                self.root.display(),
                e
            ))
        })?;
        crate::fs::write_atomic(&path, bytes).map_err(|e| {
            SophicError::Storage(format!("Atomic write to {} failed: {}", path.display(), e))
        })
    }
}
