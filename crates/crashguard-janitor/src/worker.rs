//! Background worker for continuous Janitor operation

use crate::{JanitorConfig, JanitorError, JanitorMetrics, LockJanitor};
use std::path::PathBuf;
use tokio::time::{interval_at, Duration, Instant, Interval};

/// Background worker that sweeps stale markers on a schedule
///
/// The first periodic sweep happens one interval after the worker starts;
/// the unconditional startup sweep is the caller's job.
///
/// # Examples
///
/// ```no_run
/// use crashguard_janitor::{JanitorConfig, LockJanitorWorker};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let worker = LockJanitorWorker::new("/home/agent/.openclaw/agents", JanitorConfig::default())?;
///
///     // Runs until the runtime shuts down
///     worker.run().await;
///     Ok(())
/// }
/// ```
pub struct LockJanitorWorker {
    janitor: LockJanitor,
    interval: Duration,
}

impl LockJanitorWorker {
    /// Create a new background worker with the given configuration
    pub fn new(root: impl Into<PathBuf>, config: JanitorConfig) -> Result<Self, JanitorError> {
        config.validate()?;
        let interval = config.scan_interval();
        Ok(Self {
            janitor: LockJanitor::new(root, config),
            interval,
        })
    }

    /// Wrap an existing janitor, keeping its metrics
    pub fn from_janitor(janitor: LockJanitor) -> Result<Self, JanitorError> {
        janitor.config().validate()?;
        let interval = janitor.config().scan_interval();
        Ok(Self { janitor, interval })
    }

    fn ticker(&self) -> Interval {
        interval_at(Instant::now() + self.interval, self.interval)
    }

    /// Run the worker indefinitely
    ///
    /// Never returns on its own; the task is dropped with the runtime.
    pub async fn run(mut self) {
        let mut ticker = self.ticker();

        tracing::info!(
            "Lock janitor started (interval: {:?}, max age: {:?})",
            self.interval,
            self.janitor.config().max_age()
        );

        loop {
            ticker.tick().await;
            tracing::trace!("Starting marker sweep");
            self.janitor.sweep_stale();
        }
    }

    /// Run for a specific number of cycles (useful for testing)
    pub async fn run_cycles(&mut self, cycles: usize) -> usize {
        let mut ticker = self.ticker();
        let mut removed = 0;

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting marker sweep {}/{}", cycle + 1, cycles);
            removed += self.janitor.sweep_stale();
        }

        tracing::info!(
            "Lock janitor finished {} cycles. Final metrics:\n{}",
            cycles,
            self.janitor.metrics().summary()
        );
        removed
    }

    /// Get a reference to the janitor's current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::SystemTime;

    fn fast_config() -> JanitorConfig {
        JanitorConfig {
            scan_interval_secs: 30,
            max_age_secs: 60,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_worker_rejects_invalid_config() {
        let config = JanitorConfig {
            scan_interval_secs: 0,
            ..Default::default()
        };
        assert!(LockJanitorWorker::new("/nonexistent", config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("main/s1.lock");
        fs::create_dir_all(marker.parent().unwrap()).unwrap();
        fs::write(&marker, b"pid").unwrap();
        File::options()
            .write(true)
            .open(&marker)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(600))
            .unwrap();

        let mut worker = LockJanitorWorker::new(dir.path(), fast_config()).unwrap();
        let removed = worker.run_cycles(2).await;

        assert_eq!(removed, 1);
        assert_eq!(worker.metrics().sweep_count, 2);
        assert!(!marker.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_janitor_keeps_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let mut janitor = LockJanitor::new(dir.path(), fast_config());
        janitor.sweep(Duration::ZERO);

        let mut worker = LockJanitorWorker::from_janitor(janitor).unwrap();
        worker.run_cycles(1).await;
        assert_eq!(worker.metrics().sweep_count, 2);
    }
}
