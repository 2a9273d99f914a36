//! Suppress-or-escalate decision for escaped faults

use crate::{FaultSignature, SupervisorError};
use crashguard_domain::{Fault, Verdict};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic count of suppressed faults
///
/// Only the classifier increments it; everyone else may only read it.
#[derive(Debug, Default)]
pub struct SuppressionCounter(AtomicU64);

impl SuppressionCounter {
    fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current count
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Decides whether an escaped fault is a known transient race
///
/// # Examples
///
/// ```
/// use crashguard_domain::{Fault, Verdict};
/// use crashguard_supervisor::{FaultClassifier, FaultSignature};
///
/// let classifier = FaultClassifier::new(FaultSignature::default()).unwrap();
///
/// let transient = Fault::new("fetch failed", "at connect (node_modules/undici/lib/core/connect.js)");
/// assert_eq!(classifier.handle(&transient), Verdict::Suppress);
///
/// let unrelated = Fault::new("fetch failed", "at main (src/main.rs)");
/// assert_eq!(classifier.handle(&unrelated), Verdict::Escalate);
///
/// assert_eq!(classifier.suppressed(), 1);
/// ```
#[derive(Debug)]
pub struct FaultClassifier {
    signature: FaultSignature,
    suppressed: SuppressionCounter,
}

impl FaultClassifier {
    /// Create a classifier for the given signature
    pub fn new(signature: FaultSignature) -> Result<Self, SupervisorError> {
        signature.validate()?;
        Ok(Self {
            signature,
            suppressed: SuppressionCounter::default(),
        })
    }

    /// The signature in use
    pub fn signature(&self) -> &FaultSignature {
        &self.signature
    }

    /// Classify without side effects
    pub fn classify(&self, fault: &Fault) -> Verdict {
        if self.signature.matches(fault) {
            Verdict::Suppress
        } else {
            Verdict::Escalate
        }
    }

    /// Classify, counting and logging suppressed faults
    ///
    /// On `Escalate` nothing happens here; re-raising is the caller's job.
    pub fn handle(&self, fault: &Fault) -> Verdict {
        let verdict = self.classify(fault);
        if verdict == Verdict::Suppress {
            let count = self.suppressed.increment();
            tracing::warn!(
                suppressed = count,
                "Suppressed transient fault #{}: {}",
                count,
                fault.message()
            );
        }
        verdict
    }

    /// Number of faults suppressed so far
    pub fn suppressed(&self) -> u64 {
        self.suppressed.get()
    }

    /// Read-only view of the counter
    pub fn counter(&self) -> &SuppressionCounter {
        &self.suppressed
    }
}
