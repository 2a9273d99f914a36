//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur while setting up the Janitor
///
/// Sweeps themselves never fail: per-file problems are skipped.
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
