//! Application settings: the validated model and its encrypted store.

pub mod model;
pub mod store;

pub use model::{
    AppSettings, Theme, AUTO_SAVE_INTERVAL_RANGE, BACKUP_FREQUENCY_RANGE,
    DEFAULT_CATEGORY_MAX_CHARS, TEXT_SIZE_RANGE,
};
pub use store::{SecureSettingsStore, DEFAULT_SETTINGS_KEY};
