//! Passphrase policy for long-lived stores.

use crate::error::{Result, SophicError};

/// Minimum passphrase length in characters.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Validate that a passphrase is acceptable for protecting a settings store.
///
/// Requires at least [`MIN_PASSPHRASE_LENGTH`] characters and something other
/// than whitespace.
///
/// # Examples
///
/// ```
/// use sophic_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("TestPassword123!").is_ok());
/// assert!(validate_passphrase("short").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(SophicError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    let length = passphrase.chars().count();
    if length < MIN_PASSPHRASE_LENGTH {
        return Err(SophicError::InvalidInput(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH, length
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passphrase() {
        assert!(validate_passphrase("TestPassword123!").is_ok());
        assert!(validate_passphrase("longer passphrase with spaces").is_ok());
    }

    #[test]
    fn test_passphrase_too_short() {
        let result = validate_passphrase("short");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 8 characters"));
    }

    #[test]
    fn test_passphrase_blank() {
        assert!(validate_passphrase("").is_err());
        assert!(validate_passphrase("          ").is_err());
        assert!(validate_passphrase("\n\t").is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 4 chars, 8 bytes
        assert!(validate_passphrase("éééé").is_err());
        assert!(validate_passphrase("éééééééé").is_ok());
    }
}
