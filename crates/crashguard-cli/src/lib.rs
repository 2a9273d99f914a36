//! crashguard command-line library.
//!
//! Wires the janitor, the mirror and the supervisor into a host process:
//! configuration loading, the startup sequence, and the commands behind the
//! `crashguard` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod guard;

pub use cli::{Cli, Command, SweepArgs};
pub use config::GuardConfig;
pub use error::{CliError, Result};
pub use guard::{Guard, StartupReport};
