//! crashguard Mirror
//!
//! Keeps a durable copy of the working-state directory so that a process
//! restart or a storage reset does not lose recent state.
//!
//! # Overview
//!
//! - **restore**: at startup, an empty or missing working directory is
//!   refilled from the backup. A working directory with any entry is never
//!   touched.
//! - **backup**: every regular file directly inside the working directory is
//!   copied over its backup when its mtime is strictly newer than the
//!   backup's. Subdirectories are ignored.
//!
//! Every per-file failure is skipped; neither operation returns an error.
//!
//! # Usage
//!
//! ```no_run
//! use crashguard_mirror::{MirrorConfig, MirrorWorker, StateMirror};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mirror = StateMirror::new("/srv/state/memory", "/srv/state/.memory-backup");
//!     mirror.restore();
//!     mirror.backup();
//!
//!     let worker = MirrorWorker::new(mirror, &MirrorConfig::default())?;
//!     worker.run().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod mirror;
mod worker;

pub use config::MirrorConfig;
pub use error::MirrorError;
pub use mirror::{MirrorReport, StateMirror};
pub use worker::MirrorWorker;
