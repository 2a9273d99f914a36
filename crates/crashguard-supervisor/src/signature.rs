//! Signature of the transient faults eligible for suppression

use crate::SupervisorError;
use crashguard_domain::Fault;
use serde::{Deserialize, Serialize};

/// Message fragment of a session set on an already torn-down handle
pub const SET_SESSION_NULL_ACCESS: &str = "reading 'setSession'";

/// Message fragment of a generic failed request
pub const REQUEST_FAILED: &str = "fetch failed";

/// Stack fragment identifying the networking dependency
pub const DEFAULT_STACK_MARKER: &str = "undici";

/// Which faults count as known-transient
///
/// A fault matches only if its message contains one of
/// `transient_messages` AND its stack contains `stack_marker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultSignature {
    /// Message fragments of known transient faults
    pub transient_messages: Vec<String>,

    /// Stack fragment naming the dependency the fault must originate from
    pub stack_marker: String,
}

impl Default for FaultSignature {
    fn default() -> Self {
        Self {
            transient_messages: vec![
                SET_SESSION_NULL_ACCESS.to_string(),
                REQUEST_FAILED.to_string(),
            ],
            stack_marker: DEFAULT_STACK_MARKER.to_string(),
        }
    }
}

impl FaultSignature {
    /// Reject fragments that would match every fault
    pub fn validate(&self) -> Result<(), SupervisorError> {
        if self.stack_marker.is_empty() {
            return Err(SupervisorError::Config("stack_marker must not be empty".to_string()));
        }
        if self.transient_messages.iter().any(String::is_empty) {
            return Err(SupervisorError::Config(
                "transient_messages must not contain empty patterns".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the message names a known transient fault
    pub fn matches_message(&self, message: &str) -> bool {
        self.transient_messages
            .iter()
            .any(|pattern| message.contains(pattern.as_str()))
    }

    /// Whether the stack trace passes through the dependency
    pub fn matches_stack(&self, stack: &str) -> bool {
        stack.contains(self.stack_marker.as_str())
    }

    /// Both conditions together
    pub fn matches(&self, fault: &Fault) -> bool {
        self.matches_message(fault.message()) && self.matches_stack(fault.stack())
    }
}
