//! Encrypted, cached persistence of [`AppSettings`].
//!
//! The store is the only reader and writer of the settings blob. Saves
//! serialize, encrypt and hand the envelope to the storage collaborator for
//! an atomic replace; loads reverse the pipeline and fall back to defaults
//! whenever the blob is missing or unusable, so a damaged file never blocks
//! startup.
//!
//! Defaults served in place of a blob that exists but cannot be read are
//! never written back. Updates and [`SecureSettingsStore::save`] refuse
//! until the blob becomes readable again or [`SecureSettingsStore::reset`]
//! replaces it.
//!
//! Every mutation runs "read cache, validate, mutate a copy, persist, commit
//! cache" inside the cache's write lock. Cache hits in [`SecureSettingsStore::load`]
//! only take the read lock.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use super::model::AppSettings;
use crate::crypto::{validate_passphrase, Cipher};
use crate::error::{Result, SophicError};
use crate::storage::RawStorage;

/// Storage key of the settings blob unless overridden.
pub const DEFAULT_SETTINGS_KEY: &str = "settings.dat";

/// Leading plaintext byte identifying the payload encoding.
const FORMAT_VERSION: u8 = 1;

/// Encrypted settings persisted through a [`RawStorage`].
pub struct SecureSettingsStore<S> {
    storage: S,
    key: String,
    passphrase: SecretString,
    cipher: Cipher,
    cache: RwLock<Option<Snapshot>>,
}

/// Cached settings and whether they may be persisted over the stored blob.
#[derive(Clone)]
struct Snapshot {
    settings: AppSettings,
    writable: bool,
}

impl<S: RawStorage> SecureSettingsStore<S> {
    /// Open a store with production KDF parameters.
    ///
    /// # Errors
    ///
    /// `SophicError::InvalidInput` if the passphrase does not meet the
    /// minimum policy.
    pub fn open(storage: S, passphrase: &str) -> Result<Self> {
        Self::with_cipher(storage, passphrase, Cipher::default())
    }

    /// Open a store that seals with the given cipher.
    pub fn with_cipher(storage: S, passphrase: &str, cipher: Cipher) -> Result<Self> {
        validate_passphrase(passphrase)?;
        Ok(Self {
            storage,
            key: DEFAULT_SETTINGS_KEY.to_string(),
            passphrase: SecretString::from(passphrase.to_string()),
            cipher,
            cache: RwLock::new(None),
        })
    }

    /// Persist under `key` instead of [`DEFAULT_SETTINGS_KEY`].
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current settings.
    ///
    /// Served from the cache when populated. Otherwise the blob is read,
    /// decrypted and decoded; if any step fails the defaults are used. The
    /// result is cached either way.
    pub fn load(&self) -> AppSettings {
        self.snapshot().settings
    }

    /// Whether the stored blob, if any, could be read with this store's
    /// passphrase. When `false`, `load` is serving defaults and every write
    /// except [`reset`](Self::reset) is refused.
    pub fn is_writable(&self) -> bool {
        self.snapshot().writable
    }

    /// Encrypt and persist `settings`, then make them the cached value.
    ///
    /// # Errors
    ///
    /// - `SophicError::InvalidContent` if `settings` fails validation
    /// - `SophicError::Integrity` if a stored blob exists but could not be
    ///   read; it is left in place
    /// - `SophicError::Storage` if the write fails; the previously persisted
    ///   blob and the cache are left untouched
    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        let mut cache = self.lock_for_update()?;
        let current = match cache.as_ref() {
            Some(snapshot) => snapshot.clone(),
            None => self.load_snapshot(),
        };
        if !current.writable {
            *cache = Some(current);
            warn!(key = %self.key, "Stored settings unreadable; refusing to overwrite");
            return Err(SophicError::Integrity);
        }
        self.commit(&mut cache, settings)
    }

    /// Drop the cached settings so the next `load` reads storage again.
    pub fn clear_cache(&self) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Persist default settings, replacing whatever was stored, including a
    /// blob that cannot be read.
    pub fn reset(&self) -> Result<AppSettings> {
        let defaults = AppSettings::default();
        let mut cache = self.lock_for_update()?;
        self.commit(&mut cache, &defaults)?;
        Ok(defaults)
    }

    /// Set and persist the text size. Returns `false`, changing nothing, if
    /// the value is out of range, the stored blob is unreadable, or the write
    /// fails.
    pub fn update_text_size(&self, value: i32) -> bool {
        self.update("text_size", |settings| settings.set_text_size(value))
    }

    /// Set and persist the auto-save interval (seconds).
    pub fn update_auto_save_interval(&self, value: i32) -> bool {
        self.update("auto_save_interval", |settings| {
            settings.set_auto_save_interval(value)
        })
    }

    /// Set and persist the backup frequency (hours).
    pub fn update_backup_frequency(&self, value: i32) -> bool {
        self.update("backup_frequency", |settings| {
            settings.set_backup_frequency(value)
        })
    }

    /// Set and persist the theme. Unknown names fall back to `Light`, so
    /// this only fails when persisting fails.
    pub fn update_theme(&self, raw: &str) -> bool {
        self.update("theme", |settings| {
            settings.set_theme(raw);
            Ok(())
        })
    }

    /// Set and persist the default category.
    pub fn update_default_category(&self, raw: &str) -> bool {
        self.update("default_category", |settings| {
            settings.set_default_category(raw)
        })
    }

    fn update<F>(&self, field: &'static str, apply: F) -> bool
    where
        F: FnOnce(&mut AppSettings) -> Result<()>,
    {
        let mut cache = match self.lock_for_update() {
            Ok(cache) => cache,
            Err(err) => {
                warn!(field, error = %err, "Settings update aborted");
                return false;
            }
        };

        let current = match cache.as_ref() {
            Some(snapshot) => snapshot.clone(),
            None => self.load_snapshot(),
        };
        if !current.writable {
            *cache = Some(current);
            warn!(field, key = %self.key, "Stored settings unreadable; update refused");
            return false;
        }

        let mut next = current.settings;
        if let Err(err) = apply(&mut next) {
            debug!(field, error = %err, "Settings update rejected");
            return false;
        }

        if let Err(err) = self.persist(&next) {
            warn!(field, error = %err, "Settings update could not be persisted");
            return false;
        }

        *cache = Some(Snapshot {
            settings: next,
            writable: true,
        });
        true
    }

    fn commit(&self, cache: &mut Option<Snapshot>, settings: &AppSettings) -> Result<()> {
        self.persist(settings)?;
        *cache = Some(Snapshot {
            settings: settings.clone(),
            writable: true,
        });
        info!(key = %self.key, "Settings saved");
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        if let Some(snapshot) = self.read_cache().as_ref() {
            return snapshot.clone();
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(snapshot) = cache.as_ref() {
            return snapshot.clone();
        }

        let snapshot = self.load_snapshot();
        *cache = Some(snapshot.clone());
        snapshot
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, Option<Snapshot>> {
        // Cached values are always complete, so a poisoned lock is still readable.
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_for_update(&self) -> Result<RwLockWriteGuard<'_, Option<Snapshot>>> {
        self.cache
            .write()
            .map_err(|_| SophicError::Storage("Settings cache poisoned".to_string()))
    }

    fn load_snapshot(&self) -> Snapshot {
        let (settings, writable) = match self.read_persisted() {
            Ok(settings) => (settings, true),
            Err(SophicError::NotFound(_)) => {
                debug!(key = %self.key, "No stored settings; using defaults");
                (AppSettings::default(), true)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Stored settings unreadable; using defaults");
                (AppSettings::default(), false)
            }
        };
        Snapshot { settings, writable }
    }

    fn read_persisted(&self) -> Result<AppSettings> {
        let envelope = self
            .storage
            .read_bytes(&self.key)?
            .ok_or_else(|| SophicError::NotFound(self.key.clone()))?;
        let payload = self
            .cipher
            .decrypt(&envelope, self.passphrase.expose_secret())?;
        decode_payload(&payload)
    }

    fn persist(&self, settings: &AppSettings) -> Result<()> {
        if !settings.is_valid() {
            return Err(SophicError::InvalidContent(
                "Refusing to persist invalid settings".to_string(),
            ));
        }
        let payload = encode_payload(settings)?;
        let envelope = self
            .cipher
            .encrypt(&payload, self.passphrase.expose_secret())?;
        self.storage.write_bytes_atomic(&self.key, &envelope)
    }
}

fn encode_payload(settings: &AppSettings) -> Result<Vec<u8>> {
    let mut payload = vec![FORMAT_VERSION];
    serde_json::to_writer(&mut payload, settings)?;
    Ok(payload)
}

fn decode_payload(payload: &[u8]) -> Result<AppSettings> {
    let (version, body) = payload
        .split_first()
        .ok_or_else(|| SophicError::InvalidContent("Empty settings payload".to_string()))?;
    if *version != FORMAT_VERSION {
        return Err(SophicError::InvalidContent(format!(
            "Unsupported settings format version {}",
            version
        )));
    }
    let settings: AppSettings = serde_json::from_slice(body)?;
    if !settings.is_valid() {
        return Err(SophicError::InvalidContent(
            "Stored settings violate constraints".to_string(),
        ));
    }
    Ok(settings)
}
