//! Command implementations.

use crate::config::GuardConfig;
use crate::error::Result;
use crate::guard::Guard;
use crate::SweepArgs;
use crashguard_janitor::LockJanitor;
use crashguard_mirror::{MirrorReport, StateMirror};
use std::time::Duration;

/// Start every guard and supervise until Ctrl-C.
///
/// Must be called inside a `LocalSet` on a current-thread runtime.
pub async fn execute_run(config: GuardConfig) -> Result<()> {
    let guard = Guard::start(config)?;

    let suppressed = guard
        .supervise(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Cannot listen for shutdown signal: {}", e);
                return;
            }
            tracing::info!("Shutdown signal received, stopping crashguard");
        })
        .await?;

    tracing::info!("crashguard stopped ({} faults suppressed)", suppressed);
    Ok(())
}

/// Sweep markers once and return how many were removed.
pub fn execute_sweep(args: &SweepArgs, mut config: GuardConfig) -> Result<usize> {
    config.janitor.dry_run |= args.dry_run;
    let layout = config.layout()?;

    let max_age = if args.all {
        Duration::ZERO
    } else {
        config.janitor.max_age()
    };

    let mut janitor = LockJanitor::new(&layout.agents_root, config.janitor);
    let removed = janitor.sweep(max_age);
    println!("{}", janitor.metrics().summary());
    Ok(removed)
}

/// Run one backup pass.
pub fn execute_backup(config: &GuardConfig) -> Result<MirrorReport> {
    let report = mirror(config)?.backup();
    print_report("backup", &report);
    Ok(report)
}

/// Run one restore pass.
pub fn execute_restore(config: &GuardConfig) -> Result<MirrorReport> {
    let report = mirror(config)?.restore();
    print_report("restore", &report);
    Ok(report)
}

/// Print the effective configuration.
pub fn execute_config(config: &GuardConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

fn mirror(config: &GuardConfig) -> Result<StateMirror> {
    let layout = config.layout()?;
    Ok(StateMirror::new(layout.working_dir, layout.backup_dir))
}

fn print_report(pass: &str, report: &MirrorReport) {
    println!(
        "{}: {} copied, {} unchanged, {} skipped",
        pass, report.copied, report.unchanged, report.skipped
    );
}
