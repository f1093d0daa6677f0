//! Passphrase-based authenticated encryption envelopes.
//!
//! Every envelope is self-describing apart from the KDF parameters:
//!
//! ```text
//! salt (16) || nonce (12) || ciphertext (n) || tag (16)
//! ```
//!
//! A fresh salt and nonce are drawn from the OS RNG on every call, so sealing
//! the same plaintext twice never yields the same bytes. Opening verifies the
//! GCM tag (constant-time comparison inside `aes-gcm`) before any plaintext
//! is released; any mismatch surfaces as [`SophicError::Integrity`].

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::key::{derive_key, KdfParams};
use crate::error::{Result, SophicError};

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Smallest well-formed envelope (empty plaintext).
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Seals and opens envelopes with a fixed set of KDF parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cipher {
    params: KdfParams,
}

impl Cipher {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypt `plaintext` under `passphrase`.
    ///
    /// Empty plaintext is valid and produces a [`MIN_ENVELOPE_LEN`] envelope.
    ///
    /// # Errors
    ///
    /// `SophicError::Crypto` if the RNG, the KDF parameters or the cipher
    /// fail.
    pub fn encrypt(&self, plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        fill_random(&mut salt)?;
        fill_random(&mut nonce)?;

        let key = derive_key(passphrase, &salt, &self.params)?;
        let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        let sealed = aead
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| SophicError::Crypto(format!("Encryption failed: {}", e)))?;

        let mut envelope = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&sealed);
        Ok(envelope)
    }

    /// Decrypt an envelope produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// `SophicError::Integrity` if the passphrase is wrong, any byte of the
    /// envelope was altered, the envelope is truncated, or no key can be
    /// derived from it. No partial plaintext is ever returned.
    pub fn decrypt(&self, envelope: &[u8], passphrase: &str) -> Result<Vec<u8>> {
        if envelope.len() < MIN_ENVELOPE_LEN {
            return Err(SophicError::Integrity);
        }

        let (salt, rest) = envelope.split_at(SALT_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);

        let key =
            derive_key(passphrase, salt, &self.params).map_err(|_| SophicError::Integrity)?;
        let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        aead.decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| SophicError::Integrity)
    }

    /// Encrypt a UTF-8 string into a base64 envelope.
    pub fn encrypt_str(&self, plaintext: &str, passphrase: &str) -> Result<String> {
        let envelope = self.encrypt(plaintext.as_bytes(), passphrase)?;
        Ok(STANDARD.encode(envelope))
    }

    /// Decrypt a base64 envelope back into the original string.
    ///
    /// Text that is not valid base64 is treated as tampered.
    pub fn decrypt_str(&self, encoded: &str, passphrase: &str) -> Result<String> {
        let envelope = STANDARD
            .decode(encoded.trim().as_bytes())
            .map_err(|_| SophicError::Integrity)?;
        let plaintext = self.decrypt(&envelope, passphrase)?;
        String::from_utf8(plaintext).map_err(|_| {
            SophicError::InvalidContent("Decrypted payload is not valid UTF-8".to_string())
        })
    }
}

fn fill_random(buf: &mut [u8]) -> Result<()> {
    getrandom::getrandom(buf)
        .map_err(|e| SophicError::Crypto(format!("Random generation failed: {}", e)))
}

/// Encrypt with the default (production) KDF parameters.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    Cipher::default().encrypt(plaintext, passphrase)
}

/// Decrypt with the default (production) KDF parameters.
pub fn decrypt(envelope: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    Cipher::default().decrypt(envelope, passphrase)
}
