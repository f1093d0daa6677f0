//! Category admission and persistence.
//!
//! [`CategoryGate`] is the validation front door: a name reaches the
//! [`CategorySink`] only if it is non-empty, short enough and already clean.
//! Unlike entry fields, a dirty category name is rejected rather than
//! silently repaired.

use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::error::{Result, SophicError};
use crate::sanitize::{is_clean, FieldKind};
use crate::storage::RawStorage;

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_CHARS: usize = 50;

/// Storage key of the persisted category list.
pub const CATEGORIES_KEY: &str = "categories.json";

/// Destination for accepted category names.
pub trait CategorySink: Send + Sync {
    /// Persist a name that already passed validation.
    fn persist_category(&self, name: &str) -> Result<()>;
}

impl<T: CategorySink + ?Sized> CategorySink for &T {
    fn persist_category(&self, name: &str) -> Result<()> {
        (**self).persist_category(name)
    }
}

/// Validates category names before handing them to a sink.
pub struct CategoryGate<C> {
    sink: C,
}

impl<C: CategorySink> CategoryGate<C> {
    pub fn new(sink: C) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// Add a category. Returns `true` only when the trimmed name is
    /// acceptable and the sink stored it.
    pub fn add_category(&self, name: &str) -> bool {
        let name = name.trim();

        if name.is_empty() {
            debug!("Category rejected: empty");
            return false;
        }
        if name.chars().count() > MAX_CATEGORY_CHARS {
            debug!(len = name.chars().count(), "Category rejected: too long");
            return false;
        }
        if !is_clean(name, FieldKind::Category) {
            debug!("Category rejected: unsafe content");
            return false;
        }

        match self.sink.persist_category(name) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Category could not be persisted");
                false
            }
        }
    }
}

/// Category names kept as a JSON array in a [`RawStorage`].
pub struct CategoryList<S> {
    storage: S,
    key: String,
    write_lock: Mutex<()>,
}

impl<S: RawStorage> CategoryList<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: CATEGORIES_KEY.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    /// Persist under `key` instead of [`CATEGORIES_KEY`].
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Stored names in insertion order; empty when nothing was stored yet.
    pub fn list(&self) -> Result<Vec<String>> {
        match self.storage.read_bytes(&self.key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }
}

impl<S: RawStorage> CategorySink for CategoryList<S> {
    fn persist_category(&self, name: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SophicError::Storage("Category list lock poisoned".to_string()))?;

        let mut names = self.list()?;
        let lowered = name.to_lowercase();
        if names.iter().any(|existing| existing.to_lowercase() == lowered) {
            debug!(name, "Category already present");
            return Ok(());
        }

        names.push(name.to_string());
        let bytes = serde_json::to_vec(&names)?;
        self.storage.write_bytes_atomic(&self.key, &bytes)?;
        info!(name, "Category added");
        Ok(())
    }
}
