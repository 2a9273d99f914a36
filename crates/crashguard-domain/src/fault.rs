//! Faults that escaped normal propagation, and the verdicts taken on them

use std::any::Any;
use std::fmt;

/// Decision taken on an escaped fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Known transient fault: count it, log it, keep the process running
    Suppress,

    /// Anything else: re-raise through normal propagation
    Escalate,
}

impl Verdict {
    /// Get the verdict name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Suppress => "suppress",
            Verdict::Escalate => "escalate",
        }
    }
}

/// A fault that escaped its work unit
///
/// Carries the human-readable message and stack trace used for
/// classification. When the fault came from a panic, the original payload is
/// kept so an escalation can resume the unwind with it unchanged.
pub struct Fault {
    message: String,
    stack: String,
    payload: Option<Box<dyn Any + Send + 'static>>,
}

impl Fault {
    /// Create a fault from a message and stack trace
    pub fn new(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: stack.into(),
            payload: None,
        }
    }

    /// Create a fault from a panic payload and the stack captured for it
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>, stack: impl Into<String>) -> Self {
        let message = panic_message(payload.as_ref());
        Self {
            message,
            stack: stack.into(),
            payload: Some(payload),
        }
    }

    /// The fault message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The stack trace, possibly empty
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Consume the fault, returning a payload suitable for `resume_unwind`
    pub fn into_payload(self) -> Box<dyn Any + Send + 'static> {
        match self.payload {
            Some(payload) => payload,
            None => Box::new(self.message),
        }
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("message", &self.message)
            .field("stack_len", &self.stack.len())
            .field("from_panic", &self.payload.is_some())
            .finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Extract the message of a panic payload (`&str` or `String`)
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("Box<dyn Any>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let static_str: Box<dyn Any + Send> = Box::new("fetch failed");
        let owned: Box<dyn Any + Send> = Box::new(String::from("socket hang up"));
        let opaque: Box<dyn Any + Send> = Box::new(42u32);

        assert_eq!(panic_message(static_str.as_ref()), "fetch failed");
        assert_eq!(panic_message(owned.as_ref()), "socket hang up");
        assert_eq!(panic_message(opaque.as_ref()), "Box<dyn Any>");
    }

    #[test]
    fn test_payload_survives_round_trip() {
        let fault = Fault::from_panic(Box::new(7u8), "stack");
        let payload = fault.into_payload();
        assert_eq!(payload.downcast_ref::<u8>(), Some(&7));

        let fault = Fault::new("plain", "");
        let payload = fault.into_payload();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("plain"));
    }
}
