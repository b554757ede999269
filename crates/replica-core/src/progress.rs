//! Progress events emitted during a run
//!
//! Subscribing is optional: the engine emits on an unbounded channel when one
//! is attached and drops events on the floor when the receiver is gone.
//! Correctness never depends on a subscriber being present.

use replica_log::OutcomeStatus;

/// One progress observation. Indexes are 1-based for display.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// An entry entered the pipeline.
    EntryStarted {
        index: usize,
        total: usize,
        id: String,
        name: String,
    },
    /// An entry reached its terminal status.
    EntryFinished {
        index: usize,
        total: usize,
        id: String,
        name: String,
        status: OutcomeStatus,
    },
    /// All dispatched entries have completed.
    RunFinished { processed: usize },
}

/// Sending half the engine holds when a subscriber is attached.
pub type ProgressSender = tokio::sync::mpsc::UnboundedSender<ProgressEvent>;
