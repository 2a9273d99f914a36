//! crashguard Janitor
//!
//! Reclaims reservation markers (`*.lock` files) abandoned by session
//! holders that exited without releasing them.
//!
//! # Overview
//!
//! Session-holding processes drop a marker file somewhere under the agents
//! tree while a session is active and delete it on graceful release. A
//! process that crashes leaves its marker behind, blocking the session
//! forever. The janitor:
//! - **Startup sweep**: removes every marker once, since a freshly started
//!   host cannot have live owners from a previous run
//! - **Periodic sweep**: removes markers whose mtime is older than the
//!   configured age (11 minutes by default), every 30 seconds
//! - **Metrics collection**: counts sweeps, removals and skipped files
//!
//! Markers are advisory files on the local filesystem; there is no kernel
//! locking and no cross-host coordination.
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use crashguard_janitor::{JanitorConfig, LockJanitor};
//! use std::time::Duration;
//!
//! let mut janitor = LockJanitor::new("/home/agent/.openclaw/agents", JanitorConfig::default());
//! let removed = janitor.sweep(Duration::ZERO);
//! println!("{}", janitor.metrics().summary());
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use crashguard_janitor::{JanitorConfig, LockJanitorWorker};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let worker = LockJanitorWorker::new("/home/agent/.openclaw/agents", JanitorConfig::default())?;
//!     tokio::task::LocalSet::new().run_until(worker.run()).await;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [janitor]
//! max_age_secs = 660
//! scan_interval_secs = 30
//! marker_suffix = ".lock"
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod worker;

pub use config::{JanitorConfig, DEFAULT_MARKER_SUFFIX};
pub use error::JanitorError;
pub use janitor::{is_stale, LockJanitor};
pub use metrics::JanitorMetrics;
pub use worker::LockJanitorWorker;
