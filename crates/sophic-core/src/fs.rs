//! Filesystem helpers for crash-safe replacement of whole files.
//!
//! A blob is never written in place. It goes to a uniquely named sibling
//! first, is flushed to disk, and only then renamed over the destination, so
//! readers observe either the previous file or the new one.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Rename `temp_path` onto `destination`, replacing it.
///
/// The destination is never removed ahead of the rename. If the rename
/// fails the temp file is cleaned up and `destination` keeps whatever it
/// held before.
pub fn commit_staged(temp_path: &Path, destination: &Path) -> io::Result<()> {
    fs::rename(temp_path, destination).map_err(|err| {
        let _ = fs::remove_file(temp_path);
        io::Error::new(
            err.kind(),
            format!("Atomic rename onto {} failed: {}", destination.display(), err),
        )
    })
}

/// Sibling path used to stage a write to `destination`.
fn staging_path(destination: &Path) -> io::Result<PathBuf> {
    let parent = destination
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    Ok(parent.join(format!(".{}.{}.tmp", filename, Uuid::new_v4().simple())))
}

/// Write `data` to `destination` atomically.
///
/// On any failure the staging file is removed and `destination` keeps its
/// previous contents (or stays absent).
pub fn write_atomic(destination: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = staging_path(destination)?;

    let staged = (|| -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()
    })();

    if let Err(err) = staged {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    commit_staged(&temp_path, destination)
}
