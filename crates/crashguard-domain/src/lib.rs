//! crashguard Domain Layer
//!
//! Shared vocabulary for the crashguard maintenance layer. Like the other
//! domain crates in this workspace it has no external dependencies: it only
//! defines value types and the trait boundaries the infrastructure crates
//! implement or consume.
//!
//! ## Key Concepts
//!
//! - **Layout**: where reservation markers, working state and backups live
//! - **Best-effort filesystem outcome**: every per-file operation either
//!   succeeds or yields an [`FsSkip`] that callers skip over
//! - **Fault / Verdict**: an escaped failure and the decision taken on it
//! - **Session policy**: the capability set a TLS transport is composed with

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fault;
pub mod fs;
pub mod layout;
pub mod session;
pub mod traits;

// Re-exports for convenience
pub use fault::{Fault, Verdict};
pub use fs::{attempt, FsOutcome, FsSkip};
pub use layout::GuardLayout;
pub use session::{ConnectOptions, GuardedTransport, NoSessionReuse};
