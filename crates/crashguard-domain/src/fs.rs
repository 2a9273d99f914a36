//! Best-effort filesystem outcomes
//!
//! The janitor and the mirror share the same policy: every per-file operation
//! is isolated, and an expected failure skips that file without touching the
//! rest of the batch. [`attempt`] turns an `io::Result` into an [`FsOutcome`]
//! so that loops can match on the skip reason instead of propagating errors.

use std::fmt;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Why a single filesystem operation was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsSkip {
    /// The entry does not exist (never created, or removed concurrently)
    NotFound,

    /// The entry exists but may not be read or changed
    PermissionDenied,

    /// Any other I/O failure
    Other(io::ErrorKind),
}

impl From<&io::Error> for FsSkip {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsSkip::NotFound,
            io::ErrorKind::PermissionDenied => FsSkip::PermissionDenied,
            kind => FsSkip::Other(kind),
        }
    }
}

impl From<io::Error> for FsSkip {
    fn from(err: io::Error) -> Self {
        FsSkip::from(&err)
    }
}

impl fmt::Display for FsSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsSkip::NotFound => write!(f, "not found"),
            FsSkip::PermissionDenied => write!(f, "permission denied"),
            FsSkip::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// Result of a best-effort filesystem operation
pub type FsOutcome<T> = Result<T, FsSkip>;

/// Classify an I/O result as success or an ignorable skip
pub fn attempt<T>(result: io::Result<T>) -> FsOutcome<T> {
    result.map_err(FsSkip::from)
}

/// Modification time of `path`, following symlinks
pub fn modified(path: &Path) -> FsOutcome<SystemTime> {
    attempt(std::fs::metadata(path).and_then(|meta| meta.modified()))
}

/// Modification time of `path`, or the Unix epoch when it cannot be read
pub fn modified_or_epoch(path: &Path) -> SystemTime {
    modified(path).unwrap_or(UNIX_EPOCH)
}

/// Whether `path` is a directory with at least one entry
///
/// A missing directory has no entries. Any other failure to list it is
/// returned as a skip, since the directory may well hold data.
pub fn has_entries(path: &Path) -> FsOutcome<bool> {
    match attempt(std::fs::read_dir(path)) {
        Ok(mut entries) => Ok(entries.next().is_some()),
        Err(FsSkip::NotFound) => Ok(false),
        Err(skip) => Err(skip),
    }
}
