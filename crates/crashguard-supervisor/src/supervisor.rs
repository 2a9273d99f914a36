//! Top-level supervisor for the host's work units
//!
//! Host work runs as local tasks owned by the [`Supervisor`]. A task that
//! panics is turned into a [`Fault`] and handed to the classifier: a
//! suppressed fault discards that task and the others keep running, an
//! escalated one resumes the unwind out of [`Supervisor::run`], which ends
//! the process the way any unhandled panic would.
//!
//! Stacks are captured by a panic hook installed once per process. The hook
//! only captures while a supervised task is being polled, and keeps the
//! capture quiet only for panics the classifier would suppress; every other
//! panic still goes to the previously installed hook as well.

use crate::FaultClassifier;
use crashguard_domain::fault::panic_message;
use crashguard_domain::{Fault, Verdict};
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::{Arc, Once};
use std::task::{Context, Poll};
use tokio::task::{self, JoinError, JoinSet};

static HOOK: Once = Once::new();

thread_local! {
    static SUPERVISING: RefCell<Option<Arc<FaultClassifier>>> = const { RefCell::new(None) };
    static CAPTURED: RefCell<HashMap<task::Id, String>> = RefCell::new(HashMap::new());
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let classifier = SUPERVISING.with(|current| current.borrow().clone());
            let (Some(id), Some(classifier)) = (task::try_id(), classifier) else {
                previous(info);
                return;
            };

            let location = info
                .location()
                .map(|location| location.to_string())
                .unwrap_or_default();
            let stack = format!("at {}\n{}", location, Backtrace::force_capture());

            let fault = Fault::new(panic_message(info.payload()), stack.as_str());
            if classifier.classify(&fault) == Verdict::Escalate {
                previous(info);
            }
            CAPTURED.with(|captured| {
                captured.borrow_mut().insert(id, stack);
            });
        }));
    });
}

fn take_stack(id: task::Id) -> String {
    CAPTURED
        .with(|captured| captured.borrow_mut().remove(&id))
        .unwrap_or_default()
}

/// Makes the classifier visible to the hook while a unit is polled
struct SupervisedScope {
    was: Option<Arc<FaultClassifier>>,
}

impl SupervisedScope {
    fn enter(classifier: &Arc<FaultClassifier>) -> Self {
        Self {
            was: SUPERVISING.with(|current| current.replace(Some(Arc::clone(classifier)))),
        }
    }
}

impl Drop for SupervisedScope {
    fn drop(&mut self) {
        let was = self.was.take();
        SUPERVISING.with(|current| *current.borrow_mut() = was);
    }
}

struct Supervised<F> {
    inner: Pin<Box<F>>,
    classifier: Arc<FaultClassifier>,
}

impl<F: Future> Future for Supervised<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let _scope = SupervisedScope::enter(&this.classifier);
        let poll = this.inner.as_mut().poll(cx);

        // A unit that completes caught its own panics; nothing will ask for
        // their stacks
        if poll.is_ready() {
            if let Some(id) = task::try_id() {
                take_stack(id);
            }
        }
        poll
    }
}

/// Runs host work units and decides the fate of their faults
///
/// Must be driven from inside a [`tokio::task::LocalSet`].
///
/// # Examples
///
/// ```
/// use crashguard_supervisor::{FaultClassifier, FaultSignature, Supervisor};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let classifier = FaultClassifier::new(FaultSignature::default()).unwrap();
///     let local = tokio::task::LocalSet::new();
///
///     local
///         .run_until(async move {
///             let mut supervisor = Supervisor::new(classifier);
///             supervisor.spawn(async { /* host work */ });
///             supervisor.run().await;
///         })
///         .await;
/// }
/// ```
pub struct Supervisor {
    classifier: Arc<FaultClassifier>,
    units: JoinSet<()>,
    background: JoinSet<()>,
}

impl Supervisor {
    /// Create a supervisor, installing the process-wide panic hook on first use
    pub fn new(classifier: FaultClassifier) -> Self {
        Self::with_shared(Arc::new(classifier))
    }

    /// Create a supervisor around a classifier shared with other reporters
    pub fn with_shared(classifier: Arc<FaultClassifier>) -> Self {
        install_hook();
        Self {
            classifier,
            units: JoinSet::new(),
            background: JoinSet::new(),
        }
    }

    /// Add a host work unit; `run` returns once every unit has finished
    pub fn spawn<F>(&mut self, unit: F)
    where
        F: Future<Output = ()> + 'static,
    {
        self.units.spawn_local(Supervised {
            inner: Box::pin(unit),
            classifier: Arc::clone(&self.classifier),
        });
    }

    /// Add non-essential background work
    ///
    /// Background tasks are supervised like units but do not keep `run`
    /// alive; they are aborted once the last unit finishes. A suppressed
    /// fault ends the task for good, so periodic work should keep its own
    /// loop free of panics rather than rely on being restarted.
    pub fn spawn_background<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        self.background.spawn_local(Supervised {
            inner: Box::pin(task),
            classifier: Arc::clone(&self.classifier),
        });
    }

    /// Decide on a fault reported directly by the host
    pub fn handle(&self, fault: &Fault) -> Verdict {
        self.classifier.handle(fault)
    }

    /// The classifier in use
    pub fn classifier(&self) -> &Arc<FaultClassifier> {
        &self.classifier
    }

    /// Number of faults suppressed so far
    pub fn suppressed(&self) -> u64 {
        self.classifier.suppressed()
    }

    /// Drive all units to completion
    ///
    /// Returns the suppression count. Resumes the unwind of the first fault
    /// the classifier escalates.
    pub async fn run(mut self) -> u64 {
        loop {
            tokio::select! {
                biased;
                joined = self.units.join_next() => match joined {
                    Some(result) => settle(&self.classifier, result),
                    None => break,
                },
                Some(result) = self.background.join_next(), if !self.background.is_empty() => {
                    settle(&self.classifier, result);
                }
            }
        }

        self.background.abort_all();
        while let Some(result) = self.background.join_next().await {
            settle(&self.classifier, result);
        }
        self.classifier.suppressed()
    }
}

fn settle(classifier: &FaultClassifier, result: Result<(), JoinError>) {
    let err = match result {
        Ok(()) => return,
        Err(err) if err.is_cancelled() => {
            tracing::trace!("Work unit {} cancelled", err.id());
            take_stack(err.id());
            return;
        }
        Err(err) => err,
    };

    let stack = take_stack(err.id());
    let fault = Fault::from_panic(err.into_panic(), stack);

    if classifier.handle(&fault) == Verdict::Escalate {
        tracing::error!("Unhandled fault, escalating: {}", fault.message());
        panic::resume_unwind(fault.into_payload());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FaultSignature;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    // Panic locations in this file always carry its name, which makes a
    // reliable stand-in for a dependency marker.
    fn classifier_for_this_file() -> FaultClassifier {
        FaultClassifier::new(FaultSignature {
            stack_marker: "supervisor.rs".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn block_on<F: Future>(future: F) -> F::Output {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        LocalSet::new().block_on(&runtime, future)
    }

    #[test]
    fn test_suppressed_fault_keeps_other_units_running() {
        let finished = Rc::new(Cell::new(false));
        let flag = Rc::clone(&finished);

        let suppressed = block_on(async move {
            let mut supervisor = Supervisor::new(classifier_for_this_file());
            supervisor.spawn(async {
                panic!("fetch failed");
            });
            supervisor.spawn(async move {
                task::yield_now().await;
                flag.set(true);
            });
            supervisor.run().await
        });

        assert_eq!(suppressed, 1);
        assert!(finished.get());
    }

    #[test]
    fn test_unrecognised_fault_escalates() {
        let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            block_on(async {
                let mut supervisor = Supervisor::new(classifier_for_this_file());
                supervisor.spawn(async {
                    panic!("index out of bounds");
                });
                supervisor.run().await
            })
        }));

        let payload = outcome.unwrap_err();
        assert_eq!(
            crashguard_domain::fault::panic_message(payload.as_ref()),
            "index out of bounds"
        );
    }

    #[test]
    fn test_message_match_without_marker_escalates() {
        let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            block_on(async {
                let classifier = FaultClassifier::new(FaultSignature::default()).unwrap();
                let mut supervisor = Supervisor::new(classifier);
                supervisor.spawn(async {
                    panic!("fetch failed");
                });
                supervisor.run().await
            })
        }));

        assert!(outcome.is_err());
    }

    #[test]
    fn test_background_work_does_not_keep_run_alive() {
        let ticks = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&ticks);

        let suppressed = block_on(async move {
            let mut supervisor = Supervisor::new(classifier_for_this_file());
            supervisor.spawn_background(async move {
                loop {
                    counter.set(counter.get() + 1);
                    task::yield_now().await;
                }
            });
            supervisor.spawn(async {
                for _ in 0..3 {
                    task::yield_now().await;
                }
            });
            supervisor.run().await
        });

        assert_eq!(suppressed, 0);
        assert!(ticks.get() >= 1);
    }

    #[test]
    fn test_background_fault_is_classified() {
        let suppressed = block_on(async {
            let mut supervisor = Supervisor::new(classifier_for_this_file());
            supervisor.spawn_background(async {
                panic!("fetch failed");
            });
            supervisor.spawn(async {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            });
            supervisor.run().await
        });

        assert_eq!(suppressed, 1);
    }

    fn captured_len() -> usize {
        CAPTURED.with(|captured| captured.borrow().len())
    }

    #[test]
    fn test_panics_caught_inside_unit_leave_no_stack_behind() {
        let suppressed = block_on(async {
            let mut supervisor = Supervisor::new(classifier_for_this_file());
            supervisor.spawn(async {
                for _ in 0..20 {
                    let _ = panic::catch_unwind(|| panic!("fetch failed"));
                    task::yield_now().await;
                }
            });
            supervisor.spawn_background(async {
                let _ = panic::catch_unwind(|| panic!("fetch failed"));
                std::future::pending::<()>().await;
            });
            supervisor.spawn(async {
                task::yield_now().await;
            });
            supervisor.run().await
        });

        assert_eq!(suppressed, 0);
        assert_eq!(captured_len(), 0);
    }

    #[test]
    fn test_suppressed_fault_stack_is_consumed() {
        block_on(async {
            let mut supervisor = Supervisor::new(classifier_for_this_file());
            supervisor.spawn(async {
                panic!("fetch failed");
            });
            supervisor.run().await
        });

        assert_eq!(captured_len(), 0);
    }

    #[test]
    fn test_direct_report() {
        let supervisor = Supervisor::new(FaultClassifier::new(FaultSignature::default()).unwrap());
        let fault = Fault::new("fetch failed", "at undici/lib/fetch/index.js");

        assert_eq!(supervisor.handle(&fault), Verdict::Suppress);
        assert_eq!(supervisor.suppressed(), 1);
    }
}
