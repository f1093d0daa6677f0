//! Key derivation using Argon2id.
//!
//! Keys are derived from a passphrase and a per-envelope random salt with a
//! memory-hard function, so offline guessing against a stolen settings file
//! is expensive.

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, SophicError};

/// Length of derived key in bytes (32 bytes = AES-256).
pub const KEY_LENGTH: usize = 32;

/// Minimum salt length accepted by [`derive_key`].
pub const MIN_SALT_LENGTH: usize = 16;

/// Argon2id cost parameters.
///
/// These are configuration, not part of the envelope: a blob can only be
/// opened with the parameters it was sealed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// 64 MiB, 3 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Build parameters, rejecting combinations Argon2 cannot run.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        params.to_argon2()?;
        Ok(params)
    }

    fn to_argon2(self) -> Result<argon2::Params> {
        argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| SophicError::Crypto(format!("Invalid Argon2 parameters: {}", e)))
    }
}

/// A cryptographic key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Get a reference to the raw key bytes.
    ///
    /// Use only for immediate cipher construction; never store or log it.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a passphrase using Argon2id.
///
/// Same passphrase, salt and parameters always produce the same key. Any
/// passphrase is accepted here, including the empty one; strength policy is
/// [`validate_passphrase`](super::validate_passphrase)'s job.
///
/// # Errors
///
/// - `SophicError::InvalidInput` for a salt shorter than [`MIN_SALT_LENGTH`]
/// - `SophicError::Crypto` if the parameters are rejected by Argon2
///
/// # Examples
///
/// ```
/// use sophic_core::crypto::{derive_key, KdfParams};
///
/// let params = KdfParams::new(256, 1, 1).unwrap();
/// let key = derive_key("my-passphrase", b"unique-salt-16bytes", &params).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(passphrase: &str, salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if salt.len() < MIN_SALT_LENGTH {
        return Err(SophicError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            MIN_SALT_LENGTH
        )));
    }

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params.to_argon2()?,
    );

    let mut key = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| SophicError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey { key })
}
