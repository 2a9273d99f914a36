//! Background worker for periodic backups

use crate::{MirrorConfig, MirrorError, MirrorReport, StateMirror};
use tokio::time::{interval_at, Duration, Instant, Interval};

/// Background worker that runs `backup()` on a schedule
///
/// `restore()` is never called here: it belongs to startup only.
pub struct MirrorWorker {
    mirror: StateMirror,
    interval: Duration,
    passes: usize,
}

impl MirrorWorker {
    /// Create a new background worker with the given configuration
    pub fn new(mirror: StateMirror, config: &MirrorConfig) -> Result<Self, MirrorError> {
        config.validate()?;
        Ok(Self {
            mirror,
            interval: config.backup_interval(),
            passes: 0,
        })
    }

    fn ticker(&self) -> Interval {
        interval_at(Instant::now() + self.interval, self.interval)
    }

    fn pass(&mut self) -> MirrorReport {
        self.passes += 1;
        self.mirror.backup()
    }

    /// Run the worker indefinitely
    pub async fn run(mut self) {
        let mut ticker = self.ticker();

        tracing::info!("State mirror started (interval: {:?})", self.interval);

        loop {
            ticker.tick().await;
            self.pass();
        }
    }

    /// Run for a specific number of cycles (useful for testing)
    pub async fn run_cycles(&mut self, cycles: usize) -> MirrorReport {
        let mut ticker = self.ticker();
        let mut total = MirrorReport::default();

        for _ in 0..cycles {
            ticker.tick().await;
            let report = self.pass();
            total.copied += report.copied;
            total.unchanged += report.unchanged;
            total.skipped += report.skipped;
        }
        total
    }

    /// Number of backup passes run so far
    pub fn passes(&self) -> usize {
        self.passes
    }
}
