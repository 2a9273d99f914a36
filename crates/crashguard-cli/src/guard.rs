//! Startup sequencing for the maintenance layer.

use crate::config::GuardConfig;
use crate::error::Result;
use crashguard_domain::GuardLayout;
use crashguard_janitor::{LockJanitor, LockJanitorWorker};
use crashguard_mirror::{MirrorReport, MirrorWorker, StateMirror};
use crashguard_supervisor::{FaultClassifier, Supervisor};
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// What the synchronous startup steps did.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartupReport {
    /// Markers left behind by a previous run
    pub reclaimed: usize,

    /// Restore pass
    pub restored: MirrorReport,

    /// Baseline backup pass
    pub backed_up: MirrorReport,
}

/// The three guards, started and ready to be supervised.
pub struct Guard {
    config: GuardConfig,
    layout: GuardLayout,
    janitor: LockJanitor,
    mirror: StateMirror,
    classifier: FaultClassifier,
    startup: StartupReport,
}

impl Guard {
    /// Run the synchronous startup sequence.
    ///
    /// 1. reclaim every marker (no marker can have a live owner yet)
    /// 2. restore the working directory, then re-establish the backup
    /// 3. build the fault classifier
    pub fn start(config: GuardConfig) -> Result<Self> {
        config.validate()?;
        let layout = config.layout()?;

        info!(
            "crashguard loading (markers: {}, working state: {}, backup: {})",
            layout.agents_root.display(),
            layout.working_dir.display(),
            layout.backup_dir.display()
        );

        let mut janitor = LockJanitor::new(&layout.agents_root, config.janitor.clone());
        let reclaimed = janitor.sweep(Duration::ZERO);

        let mirror = StateMirror::new(&layout.working_dir, &layout.backup_dir);
        let restored = mirror.restore();
        let backed_up = mirror.backup();

        let classifier = FaultClassifier::new(config.faults.clone())?;

        info!(
            "All guards applied ({} markers reclaimed, {} files restored)",
            reclaimed, restored.copied
        );

        Ok(Self {
            config,
            layout,
            janitor,
            mirror,
            classifier,
            startup: StartupReport {
                reclaimed,
                restored,
                backed_up,
            },
        })
    }

    /// Resolved directory layout.
    pub fn layout(&self) -> &GuardLayout {
        &self.layout
    }

    /// Outcome of the startup sequence.
    pub fn startup(&self) -> StartupReport {
        self.startup
    }

    /// Build a supervisor with both periodic workers attached as
    /// background work.
    ///
    /// Must be called inside a `LocalSet`.
    pub fn into_supervisor(self) -> Result<Supervisor> {
        let janitor = LockJanitorWorker::from_janitor(self.janitor)?;
        let mirror = MirrorWorker::new(self.mirror, &self.config.mirror)?;

        let mut supervisor = Supervisor::new(self.classifier);
        supervisor.spawn_background(janitor.run());
        supervisor.spawn_background(mirror.run());
        Ok(supervisor)
    }

    /// Supervise `host` until it finishes, with the workers running beside it.
    ///
    /// Returns the number of suppressed faults.
    pub async fn supervise<F>(self, host: F) -> Result<u64>
    where
        F: Future<Output = ()> + 'static,
    {
        let mut supervisor = self.into_supervisor()?;
        supervisor.spawn(host);
        Ok(supervisor.run().await)
    }
}
