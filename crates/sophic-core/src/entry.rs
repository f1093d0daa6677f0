//! Journal entry model.
//!
//! Text fields are private and only assignable through setters that run the
//! sanitizer, so an entry never holds unsanitized text, including one that
//! was just deserialized.

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::sanitize::{sanitize, FieldKind};

/// Ids are below this bound; 0 means "not yet assigned".
pub const MAX_ENTRY_ID: u32 = 1_000_000;

/// Years considered believable for entry timestamps.
pub const PLAUSIBLE_YEARS: RangeInclusive<i32> = 1950..=2050;

/// A single journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryRecord")]
pub struct JournalEntry {
    /// Identity, `0` while unassigned
    id: u32,

    /// Headline, at most 200 characters
    title: String,

    /// Body text; the only field that keeps line breaks
    content: String,

    /// Free-form tag list as typed by the user
    tags: String,

    /// Category name
    category: String,

    /// Mood label
    mood: String,

    /// When the entry was first written
    created_at: DateTime<Utc>,

    /// Last modification
    updated_at: DateTime<Utc>,
}

/// Unchecked wire form; every field is routed through a setter.
#[derive(Deserialize)]
struct EntryRecord {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    mood: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EntryRecord> for JournalEntry {
    fn from(record: EntryRecord) -> Self {
        let mut entry = JournalEntry::at(record.created_at);
        entry.set_id(record.id);
        entry.set_title(&record.title);
        entry.set_content(&record.content);
        entry.set_tags(&record.tags);
        entry.set_category(&record.category);
        entry.set_mood(&record.mood);
        entry.set_updated_at(record.updated_at);
        entry
    }
}

impl Default for JournalEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalEntry {
    /// Empty, unassigned entry stamped with the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Empty, unassigned entry created and last updated at `timestamp`.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            title: String::new(),
            content: String::new(),
            tags: String::new(),
            category: String::new(),
            mood: String::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Assign the id. Negative or out-of-bound values leave the entry
    /// unassigned (`0`).
    pub fn set_id(&mut self, id: i64) {
        self.id = match u32::try_from(id) {
            Ok(id) if id < MAX_ENTRY_ID => id,
            _ => 0,
        };
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, raw: &str) {
        self.title = sanitize(raw, FieldKind::Title);
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, raw: &str) {
        self.content = sanitize(raw, FieldKind::Content);
    }

    pub fn tags(&self) -> &str {
        &self.tags
    }

    pub fn set_tags(&mut self, raw: &str) {
        self.tags = sanitize(raw, FieldKind::Tags);
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_category(&mut self, raw: &str) {
        self.category = sanitize(raw, FieldKind::Category);
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub fn set_mood(&mut self, raw: &str) {
        self.mood = sanitize(raw, FieldKind::Mood);
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, timestamp: DateTime<Utc>) {
        self.created_at = timestamp;
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_updated_at(&mut self, timestamp: DateTime<Utc>) {
        self.updated_at = timestamp;
    }

    /// Stamp `updated_at` with the current time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether both timestamps fall within [`PLAUSIBLE_YEARS`].
    pub fn has_plausible_timestamps(&self) -> bool {
        PLAUSIBLE_YEARS.contains(&self.created_at.year())
            && PLAUSIBLE_YEARS.contains(&self.updated_at.year())
    }
}
