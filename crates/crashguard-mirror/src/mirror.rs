//! Bidirectional mirror between the working-state and backup directories

use crashguard_domain::fs::{attempt, has_entries, modified_or_epoch, FsOutcome};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What a single restore or backup pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Files copied
    pub copied: usize,

    /// Files left alone because the destination was already current
    pub unchanged: usize,

    /// Files skipped because an operation on them failed
    pub skipped: usize,
}

impl MirrorReport {
    /// Whether the pass changed nothing on disk
    pub fn is_noop(&self) -> bool {
        self.copied == 0
    }
}

/// Mirror between a working-state directory and its backup
///
/// Only regular files directly inside the directories take part; there is
/// no recursion and no merging beyond "newest wins".
///
/// # Examples
///
/// ```no_run
/// use crashguard_mirror::StateMirror;
///
/// let mirror = StateMirror::new(
///     "/home/agent/.openclaw/workspace/memory",
///     "/home/agent/.openclaw/.memory-backup",
/// );
///
/// // Cold start: recover state into an empty working directory
/// mirror.restore();
/// // Re-establish the backup baseline
/// let report = mirror.backup();
/// println!("copied {} files", report.copied);
/// ```
#[derive(Debug, Clone)]
pub struct StateMirror {
    working_dir: PathBuf,
    backup_dir: PathBuf,
}

impl StateMirror {
    /// Create a mirror between the two directories
    pub fn new(working_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// The working-state directory
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The backup directory
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy the backup into an empty or missing working directory
    ///
    /// Does nothing when the working directory already has an entry or
    /// cannot be listed, so live data is never replaced by a stale backup. Restored files take
    /// the backup file's mtime, which makes the backup pass that follows
    /// startup a no-op for them.
    pub fn restore(&self) -> MirrorReport {
        let mut report = MirrorReport::default();

        match has_entries(&self.working_dir) {
            Ok(false) => {}
            Ok(true) => {
                tracing::debug!(
                    "Working directory {} is not empty, restore skipped",
                    self.working_dir.display()
                );
                return report;
            }
            Err(skip) => {
                tracing::warn!(
                    "Cannot list working directory {}, restore skipped: {}",
                    self.working_dir.display(),
                    skip
                );
                return report;
            }
        }

        let Some(entries) = list_dir(&self.backup_dir) else {
            return report;
        };
        if entries.is_empty() {
            return report;
        }

        if let Err(skip) = attempt(fs::create_dir_all(&self.working_dir)) {
            tracing::warn!(
                "Cannot create working directory {}: {}",
                self.working_dir.display(),
                skip
            );
            return report;
        }

        for (name, src) in entries {
            let dst = self.working_dir.join(&name);
            match restore_file(&src, &dst) {
                Ok(true) => report.copied += 1,
                Ok(false) => {}
                Err(skip) => {
                    tracing::trace!("Skipping restore of {}: {}", src.display(), skip);
                    report.skipped += 1;
                }
            }
        }

        if report.copied > 0 {
            tracing::info!(
                "Restored {} files from {}",
                report.copied,
                self.backup_dir.display()
            );
        }
        report
    }

    /// Copy working files that are newer than their backup
    ///
    /// A missing or unreadable backup file counts as infinitely old. Does
    /// nothing while the working directory is missing or empty.
    pub fn backup(&self) -> MirrorReport {
        let mut report = MirrorReport::default();

        let Some(entries) = list_dir(&self.working_dir) else {
            return report;
        };
        if entries.is_empty() {
            return report;
        }

        if let Err(skip) = attempt(fs::create_dir_all(&self.backup_dir)) {
            tracing::warn!(
                "Cannot create backup directory {}: {}",
                self.backup_dir.display(),
                skip
            );
            return report;
        }

        for (name, src) in entries {
            let dst = self.backup_dir.join(&name);
            match backup_file(&src, &dst) {
                Ok(true) => report.copied += 1,
                Ok(false) => report.unchanged += 1,
                Err(skip) => {
                    tracing::trace!("Skipping backup of {}: {}", src.display(), skip);
                    report.skipped += 1;
                }
            }
        }

        if report.copied > 0 {
            tracing::info!(
                "Backed up {} files to {}",
                report.copied,
                self.backup_dir.display()
            );
        } else {
            tracing::debug!("Backup pass: {} files unchanged", report.unchanged);
        }
        report
    }
}

/// Entries of `dir` as (file name, path); `None` when it cannot be listed
fn list_dir(dir: &Path) -> Option<Vec<(std::ffi::OsString, PathBuf)>> {
    let entries = attempt(fs::read_dir(dir)).ok()?;
    Some(
        entries
            .filter_map(Result::ok)
            .map(|entry| (entry.file_name(), entry.path()))
            .collect(),
    )
}

/// Copy one backup file back; `Ok(false)` for entries that are not files
fn restore_file(src: &Path, dst: &Path) -> FsOutcome<bool> {
    let meta = attempt(fs::metadata(src))?;
    if !meta.is_file() {
        return Ok(false);
    }
    attempt(fs::copy(src, dst))?;

    if let Ok(mtime) = meta.modified() {
        // Best effort; a restored file with a fresh mtime is merely re-copied
        let _ = set_mtime(dst, mtime);
    }
    Ok(true)
}

/// Copy one working file if it is newer than its backup
fn backup_file(src: &Path, dst: &Path) -> FsOutcome<bool> {
    let meta = attempt(fs::metadata(src))?;
    if !meta.is_file() {
        return Ok(false);
    }
    let src_mtime = attempt(meta.modified())?;

    if src_mtime <= modified_or_epoch(dst) {
        return Ok(false);
    }
    attempt(fs::copy(src, dst))?;
    Ok(true)
}

fn set_mtime(path: &Path, mtime: SystemTime) -> FsOutcome<()> {
    attempt(File::options().write(true).open(path).and_then(|file| file.set_modified(mtime)))
}
