//! # Sophic Core
//!
//! Integrity and input-safety layer for the Sophic journal.
//!
//! This crate guards user-authored journal data and application settings
//! against tampering and hostile input. It is consumed by a presentation
//! layer it knows nothing about.
//!
//! ## Architecture
//!
//! - **sanitize**: strips injection vectors and dangerous code points from free text
//! - **crypto**: Argon2id key derivation + AES-256-GCM envelopes
//! - **settings**: validated `AppSettings` and the encrypted, cached `SecureSettingsStore`
//! - **entry**: `JournalEntry` whose setters sanitize every field
//! - **category**: `CategoryGate` that admits only clean category names
//! - **storage**: raw byte storage collaborators with atomic replace semantics

pub mod category;
pub mod crypto;
pub mod entry;
pub mod error;
pub mod fs;
pub mod sanitize;
pub mod settings;
pub mod storage;

pub use category::{CategoryGate, CategoryList, CategorySink};
pub use crypto::{Cipher, KdfParams};
pub use entry::JournalEntry;
pub use error::{Result, SophicError};
pub use sanitize::{sanitize, FieldKind};
pub use settings::{AppSettings, SecureSettingsStore, Theme};
pub use storage::{FileStorage, MemoryStorage, RawStorage};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
