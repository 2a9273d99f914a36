//! Error types for mirror setup

use thiserror::Error;

/// Errors that can occur while setting up the mirror
///
/// `restore()` and `backup()` themselves never fail.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
