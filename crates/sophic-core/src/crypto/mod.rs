//! Cryptographic operations for Sophic.
//!
//! Built on well-audited primitives:
//! - **Argon2id**: memory-hard key derivation from the user's passphrase
//! - **AES-256-GCM**: authenticated encryption of settings and journal data
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the encrypted settings or journal file
//! - Offline brute-force attacks on the passphrase
//! - Silent modification of stored ciphertext
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session or process memory

pub mod cipher;
pub mod key;
pub mod passphrase;

pub use cipher::{decrypt, encrypt, Cipher};
pub use key::{derive_key, DerivedKey, KdfParams};
pub use passphrase::validate_passphrase;
