//! Application-level utilities for the Sophic CLI.
//!
//! This module provides:
//! - Config and data directory resolution
//! - Passphrase handling

mod context;
mod passphrase;

pub use context::AppContext;
pub use passphrase::PASSPHRASE_ENV;
