//! Error types for Sophic core operations.
//!
//! Validation, integrity and storage failures are kept apart so callers can
//! tell "the input was wrong" from "the data is unreadable" from "the disk
//! failed". The CLI layer maps these to user-facing messages.

use thiserror::Error;

/// Result type alias for Sophic operations.
pub type Result<T> = std::result::Result<T, SophicError>;

/// Core error type for Sophic operations.
#[derive(Debug, Error)]
pub enum SophicError {
    /// A numeric setting was assigned a value outside its allowed range
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A text field or decoded payload violates its content rules
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Wrong passphrase, or ciphertext that fails authentication
    #[error("Integrity check failed: wrong passphrase or tampered data")]
    Integrity,

    /// Cryptographic failure unrelated to integrity (RNG, KDF parameters)
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SophicError {
    /// Returns true for wrong-passphrase / tampered-data failures.
    pub fn is_integrity(&self) -> bool {
        matches!(self, SophicError::Integrity)
    }
}

impl From<std::io::Error> for SophicError {
    fn from(err: std::io::Error) -> Self {
        SophicError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SophicError {
    fn from(err: serde_json::Error) -> Self {
        SophicError::InvalidContent(err.to_string())
    }
}
