//! Reconciliation engine for Replica Manager
//!
//! Drives the per-entry pipeline — extension filter, local inspection,
//! remote probe, bounded-retry transfer, integrity verification, outcome
//! recording — against any [`replica_store::ObjectStore`] implementation.
//! Load-fatal errors abort before any entry is processed; every per-entry
//! error is absorbed into exactly one outcome record and never crosses the
//! entry boundary.

pub mod check;
pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod summary;
pub mod transfer;

pub use check::{CheckProblem, CheckSummary, check_sweep};
pub use config::{ConfigFile, RunConfig, RunOverrides, resolve_run_config};
pub use engine::ReconcileEngine;
pub use error::{Error, Result};
pub use progress::{ProgressEvent, ProgressSender};
pub use summary::{ProblemDetail, RunSummary};
pub use transfer::{RetryPolicy, TransferFailure, transfer};
