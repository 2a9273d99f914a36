//! crashguard Supervisor
//!
//! Last line of defence for a long-lived host: faults that escape the host's
//! own error handling are classified, and only a narrow, known-transient
//! class is suppressed.
//!
//! # Overview
//!
//! - [`FaultSignature`]: which faults are known-transient. Both a message
//!   fragment AND a stack fragment naming the networking dependency must
//!   match; a message match alone is never enough.
//! - [`FaultClassifier`]: `classify` / `handle` a [`Fault`], owning the
//!   monotonic [`SuppressionCounter`].
//! - [`Supervisor`]: runs host work units as local tasks and routes their
//!   panics through the classifier. Escalated faults resume unwinding, so
//!   the host terminates exactly as it would without the supervisor.
//!
//! [`Fault`]: crashguard_domain::Fault
//!
//! # Configuration
//!
//! ```toml
//! [faults]
//! transient_messages = ["reading 'setSession'", "fetch failed"]
//! stack_marker = "undici"
//! ```

#![warn(missing_docs)]

mod classifier;
mod error;
mod signature;
mod supervisor;

pub use classifier::{FaultClassifier, SuppressionCounter};
pub use error::SupervisorError;
pub use signature::{FaultSignature, DEFAULT_STACK_MARKER, REQUEST_FAILED, SET_SESSION_NULL_ACCESS};
pub use supervisor::Supervisor;
