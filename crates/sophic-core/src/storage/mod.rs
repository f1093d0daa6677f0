//! Raw byte storage for Sophic.
//!
//! The settings store and category list persist opaque blobs through the
//! `RawStorage` trait, so the secure layers above stay independent of where
//! bytes actually live:
//! - `FileStorage`: one file per key under a directory, replaced atomically
//!   via a synced temp file and rename
//! - `MemoryStorage`: an in-process map, for embedding and tests
//!
//! Encryption is not a storage concern; callers hand over ciphertext.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use traits::RawStorage;
