//! Core Janitor implementation for stale reservation markers

use crate::{JanitorConfig, JanitorMetrics};
use crashguard_domain::fs::{attempt, FsSkip};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Janitor for abandoned reservation markers
///
/// Each sweep re-discovers markers from disk: the whole tree under the root
/// is walked, every file whose name ends with the marker suffix is a
/// candidate, and candidates older than the threshold are unlinked.
/// Nothing about individual markers is remembered between sweeps.
///
/// # Examples
///
/// ```no_run
/// use crashguard_janitor::{JanitorConfig, LockJanitor};
/// use std::time::Duration;
///
/// let mut janitor = LockJanitor::new("/home/agent/.openclaw/agents", JanitorConfig::default());
///
/// // Fresh process: no marker can still have a live owner
/// let reclaimed = janitor.sweep(Duration::ZERO);
///
/// // Steady state: only markers older than the configured age
/// let stale = janitor.sweep_stale();
/// println!("{} + {} markers removed", reclaimed, stale);
/// ```
pub struct LockJanitor {
    root: PathBuf,
    config: JanitorConfig,
    metrics: JanitorMetrics,
}

impl LockJanitor {
    /// Create a new Janitor over the given marker root
    pub fn new(root: impl Into<PathBuf>, config: JanitorConfig) -> Self {
        Self {
            root: root.into(),
            config,
            metrics: JanitorMetrics::new(),
        }
    }

    /// Root of the marker tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Remove markers older than `max_age`; a zero age removes every marker
    ///
    /// Returns the number of markers this sweep actually unlinked. A missing
    /// root, an unreadable directory, or a marker that disappears mid-sweep
    /// is skipped; the sweep itself never fails.
    pub fn sweep(&mut self, max_age: Duration) -> usize {
        let start = Instant::now();
        let markers = self.find_markers();
        let removed = self.evict(&markers, max_age, SystemTime::now());

        self.metrics.record_sweep(removed, start.elapsed());

        if removed > 0 {
            tracing::info!(
                "Removed {} stale reservation markers under {}",
                removed,
                self.root.display()
            );
        } else {
            tracing::debug!("Sweep found {} markers, none removed", markers.len());
        }
        removed
    }

    /// Sweep with the configured maximum age
    pub fn sweep_stale(&mut self) -> usize {
        self.sweep(self.config.max_age())
    }

    /// List every marker currently under the root
    pub fn find_markers(&mut self) -> Vec<PathBuf> {
        let mut markers = Vec::new();
        let root = self.root.clone();
        self.collect_markers(&root, &mut markers);
        markers
    }

    fn collect_markers(&mut self, dir: &Path, markers: &mut Vec<PathBuf>) {
        let entries = match attempt(fs::read_dir(dir)) {
            Ok(entries) => entries,
            Err(FsSkip::NotFound) if dir == self.root => {
                tracing::trace!("Marker root {} does not exist yet", dir.display());
                return;
            }
            Err(skip) => {
                tracing::debug!("Skipping directory {}: {}", dir.display(), skip);
                self.metrics.record_skip();
                return;
            }
        };

        for entry in entries {
            let Ok(entry) = entry else {
                self.metrics.record_skip();
                continue;
            };
            // file_type() does not follow symlinks, so linked directories are
            // never descended
            let Ok(file_type) = entry.file_type() else {
                self.metrics.record_skip();
                continue;
            };

            let path = entry.path();
            if file_type.is_dir() {
                self.collect_markers(&path, markers);
            } else if entry
                .file_name()
                .to_string_lossy()
                .ends_with(self.config.marker_suffix.as_str())
            {
                markers.push(path);
            }
        }
    }

    /// Evict the listed markers that are stale at `now`
    pub(crate) fn evict(
        &mut self,
        markers: &[PathBuf],
        max_age: Duration,
        now: SystemTime,
    ) -> usize {
        let mut removed = 0;

        for marker in markers {
            let metadata = fs::symlink_metadata(marker).and_then(|meta| meta.modified());
            let mtime = match attempt(metadata) {
                Ok(mtime) => mtime,
                Err(skip) => {
                    tracing::trace!("Skipping marker {}: {}", marker.display(), skip);
                    self.metrics.record_skip();
                    continue;
                }
            };

            if !is_stale(mtime, now, max_age) {
                continue;
            }

            if self.config.dry_run {
                tracing::info!("DRY RUN: Would remove marker {}", marker.display());
                self.metrics.record_dry_run();
                continue;
            }

            match attempt(fs::remove_file(marker)) {
                Ok(()) => removed += 1,
                Err(skip) => {
                    tracing::trace!("Could not remove marker {}: {}", marker.display(), skip);
                    self.metrics.record_skip();
                }
            }
        }

        removed
    }
}

/// A marker is stale when the threshold is zero or its age exceeds it
///
/// An mtime in the future counts as age zero.
pub fn is_stale(mtime: SystemTime, now: SystemTime, max_age: Duration) -> bool {
    if max_age.is_zero() {
        return true;
    }
    let age = now.duration_since(mtime).unwrap_or(Duration::ZERO);
    age > max_age
}
