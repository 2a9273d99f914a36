//! crashguard - background maintenance for a long-lived agent host.

use crashguard_cli::commands;
use crashguard_cli::{Cli, Command, GuardConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so stdout stays clean for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> crashguard_cli::Result<()> {
    let cli = Cli::parse();
    let config = GuardConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            // One thread of control shared by the host and every timer
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let local = tokio::task::LocalSet::new();
            local.block_on(&runtime, commands::execute_run(config))?;
        }
        Command::Sweep(args) => {
            commands::execute_sweep(&args, config)?;
        }
        Command::Backup => {
            commands::execute_backup(&config)?;
        }
        Command::Restore => {
            commands::execute_restore(&config)?;
        }
        Command::Config => {
            commands::execute_config(&config)?;
        }
    }

    Ok(())
}
