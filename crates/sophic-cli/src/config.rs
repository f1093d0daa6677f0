use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sophic_core::KdfParams;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SophicConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub security: SecuritySection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    pub data_dir: Option<String>,
}

/// Argon2id cost parameters. Changing them makes existing blobs unreadable.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub kdf_memory_kib: u32,
    pub kdf_iterations: u32,
    pub kdf_parallelism: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        let params = KdfParams::default();
        Self {
            kdf_memory_kib: params.memory_kib,
            kdf_iterations: params.iterations,
            kdf_parallelism: params.parallelism,
        }
    }
}

impl SecuritySection {
    pub fn kdf_params(&self) -> anyhow::Result<KdfParams> {
        KdfParams::new(
            self.kdf_memory_kib,
            self.kdf_iterations,
            self.kdf_parallelism,
        )
        .map_err(|e| anyhow::anyhow!("Invalid [security] settings: {}", e))
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

/// Read the config at `path`; a missing file yields defaults.
pub fn load_config(path: &Path) -> anyhow::Result<SophicConfig> {
    if !path.exists() {
        return Ok(SophicConfig::default());
    }
    read_config(path)
}

pub fn read_config(path: &Path) -> anyhow::Result<SophicConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sophic"));
        }
    }
    Ok(home_dir()?.join(".config").join("sophic"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sophic"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("sophic"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
