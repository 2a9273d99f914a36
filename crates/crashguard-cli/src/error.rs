//! Error types for the command-line application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
///
/// Only configuration and startup can fail; once running, filesystem
/// problems are skipped by the components themselves.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Janitor setup error
    #[error("Janitor error: {0}")]
    Janitor(#[from] crashguard_janitor::JanitorError),

    /// Mirror setup error
    #[error("Mirror error: {0}")]
    Mirror(#[from] crashguard_mirror::MirrorError),

    /// Supervisor setup error
    #[error("Supervisor error: {0}")]
    Supervisor(#[from] crashguard_supervisor::SupervisorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
