//! Metrics collection for Janitor operations

use std::time::Duration;

/// Metrics collected across sweeps
///
/// Purely observational: nothing in the sweep logic reads these back.
#[derive(Debug, Clone, Default)]
pub struct JanitorMetrics {
    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Markers removed across all sweeps
    pub removed: usize,

    /// Markers removed by the most recent sweep
    pub last_removed: usize,

    /// Per-file operations skipped (vanished, unreadable, not removable)
    pub skipped: usize,

    /// Markers that a dry run would have removed
    pub would_remove: usize,

    /// Total time spent sweeping
    pub total_runtime: Duration,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self, removed: usize, elapsed: Duration) {
        self.sweep_count += 1;
        self.removed += removed;
        self.last_removed = removed;
        self.total_runtime += elapsed;
    }

    /// Record a skipped per-file operation
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Record a marker left in place because of dry-run mode
    pub fn record_dry_run(&mut self) {
        self.would_remove += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Total runtime: {}ms", self.total_runtime.as_millis()),
            format!("Markers removed: {}", self.removed),
            format!("Skipped operations: {}", self.skipped),
        ];

        if self.would_remove > 0 {
            lines.push(format!("Dry-run candidates: {}", self.would_remove));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = JanitorMetrics::new();
        assert_eq!(metrics.sweep_count, 0);
        assert_eq!(metrics.removed, 0);
        assert_eq!(metrics.skipped, 0);
    }

    #[test]
    fn test_record_sweep() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(3, Duration::from_millis(5));
        metrics.record_sweep(0, Duration::from_millis(2));

        assert_eq!(metrics.sweep_count, 2);
        assert_eq!(metrics.removed, 3);
        assert_eq!(metrics.last_removed, 0);
        assert_eq!(metrics.total_runtime, Duration::from_millis(7));
    }

    #[test]
    fn test_reset() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(4, Duration::from_millis(1));
        metrics.record_skip();
        metrics.record_dry_run();

        metrics.reset();

        assert_eq!(metrics.sweep_count, 0);
        assert_eq!(metrics.removed, 0);
        assert_eq!(metrics.skipped, 0);
        assert_eq!(metrics.would_remove, 0);
    }

    #[test]
    fn test_summary() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(5, Duration::from_millis(120));
        metrics.record_skip();

        let summary = metrics.summary();
        assert!(summary.contains("Sweep cycles: 1"));
        assert!(summary.contains("Total runtime: 120ms"));
        assert!(summary.contains("Markers removed: 5"));
        assert!(summary.contains("Skipped operations: 1"));
        assert!(!summary.contains("Dry-run"));
    }
}
