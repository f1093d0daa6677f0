//! Validated application settings.
//!
//! Fields are private and reachable only through setters that enforce their
//! rules, so an `AppSettings` value is valid at every point a caller can
//! observe it. Numeric fields reject out-of-range values; the theme falls
//! back to `Light` for anything unrecognised; the default category is
//! cleaned silently but rejected when too long.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SophicError};
use crate::sanitize::{is_clean, scrub, FieldKind};

/// Allowed editor text sizes, in points.
pub const TEXT_SIZE_RANGE: RangeInclusive<i32> = 8..=72;
/// Allowed auto-save intervals, in seconds.
pub const AUTO_SAVE_INTERVAL_RANGE: RangeInclusive<i32> = 5..=300;
/// Allowed backup frequencies, in hours.
pub const BACKUP_FREQUENCY_RANGE: RangeInclusive<i32> = 1..=168;
/// Maximum default category length, in characters.
pub const DEFAULT_CATEGORY_MAX_CHARS: usize = 50;

// Input past this is refused before any filtering work is done.
const DEFAULT_CATEGORY_MAX_INPUT: usize = 4096;

/// Colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Auto];

    /// Canonical title-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Auto => "Auto",
        }
    }

    /// Interpret untrusted input, falling back to `Light` for anything that
    /// is not exactly a theme name or carries unsafe content.
    pub fn from_input(raw: &str) -> Theme {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SophicError;

    /// Case-insensitive match of the trimmed input. Input the sanitizer
    /// would alter is refused even if cleaning it would leave a theme name.
    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !is_clean(trimmed, FieldKind::Theme) {
            return Err(SophicError::InvalidContent(
                "Theme contains unsafe content".to_string(),
            ));
        }
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SophicError::InvalidContent(format!("Unknown theme: {:?}", trimmed)))
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SettingsRecord")]
pub struct AppSettings {
    text_size: i32,
    auto_save_interval: i32,
    backup_frequency: i32,
    theme: Theme,
    default_category: String,
}

/// Unvalidated wire form; converted through the setters on decode.
#[derive(Deserialize)]
struct SettingsRecord {
    text_size: i32,
    auto_save_interval: i32,
    backup_frequency: i32,
    theme: String,
    default_category: String,
}

impl TryFrom<SettingsRecord> for AppSettings {
    type Error = SophicError;

    fn try_from(record: SettingsRecord) -> Result<Self> {
        let mut settings = AppSettings::default();
        settings.set_text_size(record.text_size)?;
        settings.set_auto_save_interval(record.auto_save_interval)?;
        settings.set_backup_frequency(record.backup_frequency)?;
        settings.set_theme(&record.theme);
        settings.set_default_category(&record.default_category)?;
        Ok(settings)
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            text_size: 14,
            auto_save_interval: 30,
            backup_frequency: 24,
            theme: Theme::Light,
            default_category: "General".to_string(),
        }
    }
}

fn check_range(field: &'static str, value: i32, range: &RangeInclusive<i32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(SophicError::OutOfRange {
            field,
            value: value.into(),
            min: (*range.start()).into(),
            max: (*range.end()).into(),
        })
    }
}

impl AppSettings {
    /// Settings with every field at its default.
    pub fn create_default() -> Self {
        Self::default()
    }

    pub fn text_size(&self) -> i32 {
        self.text_size
    }

    /// Auto-save interval in seconds.
    pub fn auto_save_interval(&self) -> i32 {
        self.auto_save_interval
    }

    /// Backup frequency in hours.
    pub fn backup_frequency(&self) -> i32 {
        self.backup_frequency
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// # Errors
    ///
    /// `SophicError::OutOfRange` unless `value` is in [`TEXT_SIZE_RANGE`].
    pub fn set_text_size(&mut self, value: i32) -> Result<()> {
        check_range("text_size", value, &TEXT_SIZE_RANGE)?;
        self.text_size = value;
        Ok(())
    }

    /// # Errors
    ///
    /// `SophicError::OutOfRange` unless `value` is in [`AUTO_SAVE_INTERVAL_RANGE`].
    pub fn set_auto_save_interval(&mut self, value: i32) -> Result<()> {
        check_range("auto_save_interval", value, &AUTO_SAVE_INTERVAL_RANGE)?;
        self.auto_save_interval = value;
        Ok(())
    }

    /// # Errors
    ///
    /// `SophicError::OutOfRange` unless `value` is in [`BACKUP_FREQUENCY_RANGE`].
    pub fn set_backup_frequency(&mut self, value: i32) -> Result<()> {
        check_range("backup_frequency", value, &BACKUP_FREQUENCY_RANGE)?;
        self.backup_frequency = value;
        Ok(())
    }

    /// Set the theme from untrusted input. Never fails; unknown or unsafe
    /// values become `Light`.
    pub fn set_theme(&mut self, raw: &str) {
        self.theme = Theme::from_input(raw);
    }

    /// Set the default category from untrusted input.
    ///
    /// Dangerous content is removed silently. A value longer than
    /// [`DEFAULT_CATEGORY_MAX_CHARS`] after cleaning is rejected, not cut.
    ///
    /// # Errors
    ///
    /// `SophicError::InvalidContent` when the value is too long.
    pub fn set_default_category(&mut self, raw: &str) -> Result<()> {
        let too_long = || {
            SophicError::InvalidContent(format!(
                "Default category must be at most {} characters",
                DEFAULT_CATEGORY_MAX_CHARS
            ))
        };

        if raw.chars().count() > DEFAULT_CATEGORY_MAX_INPUT {
            return Err(too_long());
        }

        let cleaned = scrub(raw, FieldKind::Category);
        if cleaned.chars().count() > DEFAULT_CATEGORY_MAX_CHARS {
            return Err(too_long());
        }

        self.default_category = cleaned;
        Ok(())
    }

    /// Re-check every field constraint.
    pub fn is_valid(&self) -> bool {
        TEXT_SIZE_RANGE.contains(&self.text_size)
            && AUTO_SAVE_INTERVAL_RANGE.contains(&self.auto_save_interval)
            && BACKUP_FREQUENCY_RANGE.contains(&self.backup_frequency)
            && self.default_category.chars().count() <= DEFAULT_CATEGORY_MAX_CHARS
            && scrub(&self.default_category, FieldKind::Category) == self.default_category
    }
}
