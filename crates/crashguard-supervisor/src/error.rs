//! Error types for supervisor setup

use thiserror::Error;

/// Errors that can occur while building the classifier
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
