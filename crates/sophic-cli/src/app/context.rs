//! Application context for the Sophic CLI.
//!
//! Bundles CLI arguments with the lazily loaded config file so handlers can
//! resolve paths, KDF parameters and the passphrase without re-reading it.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;
use secrecy::{ExposeSecret, SecretString};

use sophic_core::{CategoryList, Cipher, FileStorage, SecureSettingsStore};

use crate::cli::Cli;
use crate::config::{default_config_path, default_data_dir, load_config, SophicConfig};
use crate::errors::CliError;

use super::passphrase::read_passphrase;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<SophicConfig>,
    passphrase: OnceCell<SecretString>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            passphrase: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, `--config` taking precedence over the XDG default.
    pub fn config(&self) -> anyhow::Result<&SophicConfig> {
        self.config.get_or_try_init(|| {
            let path = match self.cli.config.clone() {
                Some(path) => path,
                None => default_config_path()?,
            };
            tracing::debug!(path = %path.display(), "Loading config");
            load_config(&path)
        })
    }

    /// Data directory: `--data-dir`, then `[storage] data_dir`, then XDG.
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = self.cli.data_dir.clone() {
            return Ok(dir);
        }
        match self.config()?.storage.data_dir.as_deref() {
            Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
            _ => default_data_dir(),
        }
    }

    pub fn cipher(&self) -> anyhow::Result<Cipher> {
        Ok(Cipher::new(self.config()?.security.kdf_params()?))
    }

    pub fn passphrase(&self) -> anyhow::Result<&SecretString> {
        self.passphrase.get_or_try_init(read_passphrase)
    }

    pub fn storage(&self) -> anyhow::Result<FileStorage> {
        Ok(FileStorage::new(self.data_dir()?))
    }

    pub fn open_settings(&self) -> anyhow::Result<SecureSettingsStore<FileStorage>> {
        let store = SecureSettingsStore::with_cipher(
            self.storage()?,
            self.passphrase()?.expose_secret(),
            self.cipher()?,
        )
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
        Ok(store)
    }

    pub fn categories(&self) -> anyhow::Result<CategoryList<FileStorage>> {
        Ok(CategoryList::new(self.storage()?))
    }
}
