//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// crashguard - background maintenance for a long-lived agent host.
#[derive(Debug, Parser)]
#[command(name = "crashguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CRASHGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start all guards and run until interrupted (default)
    Run,

    /// Sweep reservation markers once
    Sweep(SweepArgs),

    /// Copy newer working-state files to the backup once
    Backup,

    /// Restore an empty working-state directory from the backup once
    Restore,

    /// Print the effective configuration
    Config,
}

/// Arguments for the sweep command.
#[derive(Debug, Parser)]
pub struct SweepArgs {
    /// Remove every marker regardless of age
    #[arg(long)]
    pub all: bool,

    /// Only report what would be removed
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["crashguard"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_sweep_flags() {
        let cli = Cli::try_parse_from(["crashguard", "sweep", "--all", "--dry-run"]).unwrap();
        match cli.command {
            Some(Command::Sweep(args)) => {
                assert!(args.all);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["crashguard", "backup", "--config", "/etc/cg.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/cg.toml")));
        assert!(matches!(cli.command, Some(Command::Backup)));
    }
}
