//! CLI error types mapped to exit codes.

use std::fmt;

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error, including rejected setting or category values
/// - 2: Usage error (reported by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// A value was refused by validation.
    pub const REJECTED: i32 = 1;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong passphrase or tampered ciphertext.
    pub const AUTH_FAILED: i32 = 5;
}

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Validation refused the value; nothing was changed.
    Rejected(String),

    /// Input could not be used at all (unreadable number, weak passphrase)
    InvalidInput(String),

    /// Decryption failed integrity checks
    AuthFailed {
        message: String,
        hint: Option<String>,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Rejected(message) | CliError::InvalidInput(message) => {
                write!(f, "{}", message)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn rejected(message: impl Into<String>) -> Self {
        CliError::Rejected(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Rejected(_) => exit_codes::REJECTED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::rejected("no").exit_code(), 1);
        assert_eq!(CliError::invalid_input("bad").exit_code(), 4);
        assert_eq!(CliError::auth_failed_with_hint("x", "y").exit_code(), 5);
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::auth_failed_with_hint("Decryption failed", "Hint: check passphrase");
        assert_eq!(err.to_string(), "Decryption failed\nHint: check passphrase");
    }
}
