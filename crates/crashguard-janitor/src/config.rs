//! Configuration for Janitor operations
//!
//! Defines the marker age threshold and the scan interval.

use crate::JanitorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Suffix that identifies a reservation marker
pub const DEFAULT_MARKER_SUFFIX: &str = ".lock";

/// Configuration for the stale-reservation janitor
///
/// # Examples
///
/// ```
/// use crashguard_janitor::JanitorConfig;
/// use std::time::Duration;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.max_age(), Duration::from_secs(11 * 60));
/// assert_eq!(config.scan_interval(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    /// Markers older than this (in seconds) are evicted by periodic sweeps
    /// Default: 660 (11 minutes)
    pub max_age_secs: u64,

    /// How often to run the periodic sweep (in seconds)
    /// Default: 30
    pub scan_interval_secs: u64,

    /// File name suffix of reservation markers
    /// Default: ".lock"
    pub marker_suffix: String,

    /// Dry-run mode: log what would be removed without removing it
    /// Default: false
    pub dry_run: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 11 * 60,
            scan_interval_secs: 30,
            marker_suffix: DEFAULT_MARKER_SUFFIX.to_string(),
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Check that the configuration can drive a worker
    ///
    /// A zero interval would make the timer spin, and an empty suffix would
    /// match every file in the tree.
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.scan_interval_secs == 0 {
            return Err(JanitorError::Config(
                "scan_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.marker_suffix.is_empty() {
            return Err(JanitorError::Config("marker_suffix must not be empty".to_string()));
        }
        Ok(())
    }

    /// Get max marker age as Duration
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    /// Get scan interval as Duration
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }
}
