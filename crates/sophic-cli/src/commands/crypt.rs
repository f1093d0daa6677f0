use std::fs;

use secrecy::ExposeSecret;

use sophic_core::fs::write_atomic;
use sophic_core::SophicError;

use crate::app::{AppContext, PASSPHRASE_ENV};
use crate::cli::CryptArgs;
use crate::errors::CliError;

pub fn handle_encrypt(ctx: &AppContext, args: &CryptArgs) -> anyhow::Result<()> {
    let plaintext = fs::read(&args.input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input.display(), e))?;

    let cipher = ctx.cipher()?;
    let envelope = cipher.encrypt(&plaintext, ctx.passphrase()?.expose_secret())?;

    write_atomic(&args.output, &envelope)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", args.output.display(), e))?;

    if !ctx.quiet() {
        println!(
            "Encrypted {} -> {}",
            args.input.display(),
            args.output.display()
        );
    }
    Ok(())
}

pub fn handle_decrypt(ctx: &AppContext, args: &CryptArgs) -> anyhow::Result<()> {
    let envelope = fs::read(&args.input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input.display(), e))?;

    let cipher = ctx.cipher()?;
    let plaintext = match cipher.decrypt(&envelope, ctx.passphrase()?.expose_secret()) {
        Ok(plaintext) => plaintext,
        Err(SophicError::Integrity) => {
            return Err(CliError::auth_failed_with_hint(
                format!("Could not decrypt {}", args.input.display()),
                format!(
                    "Hint: Check {} and the [security] KDF settings; the file may also be damaged.",
                    PASSPHRASE_ENV
                ),
            )
            .into());
        }
        Err(err) => return Err(err.into()),
    };

    write_atomic(&args.output, &plaintext)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", args.output.display(), e))?;

    if !ctx.quiet() {
        println!(
            "Decrypted {} -> {}",
            args.input.display(),
            args.output.display()
        );
    }
    Ok(())
}
