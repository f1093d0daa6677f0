//! Passphrase acquisition.

use std::io::IsTerminal;

use dialoguer::Password;
use secrecy::SecretString;

use sophic_core::crypto::validate_passphrase;

use crate::errors::CliError;

pub const PASSPHRASE_ENV: &str = "SOPHIC_PASSPHRASE";

/// Read the passphrase from `SOPHIC_PASSPHRASE`, or prompt when attached to
/// a terminal.
pub fn read_passphrase() -> anyhow::Result<SecretString> {
    let passphrase = match std::env::var(PASSPHRASE_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => prompt_passphrase()?,
    };
    validate_passphrase(&passphrase).map_err(|e| CliError::invalid_input(e.to_string()))?;
    Ok(SecretString::from(passphrase))
}

fn prompt_passphrase() -> anyhow::Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ));
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}
