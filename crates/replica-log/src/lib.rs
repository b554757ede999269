//! Outcome logging for Replica Manager
//!
//! The outcome log is the run's only persisted state: one terminal record per
//! processed entry, appended and flushed as each entry completes. The log
//! file is itself a valid input to the retry-set generator, which closes the
//! loop by deriving a new catalog manifest from a prior run's failures.

pub mod error;
pub mod reader;
pub mod record;
pub mod retry;
pub mod status;
pub mod writer;

pub use error::{Error, Result};
pub use reader::read_log;
pub use record::{LOG_HEADER, OutcomeRecord};
pub use retry::{default_retry_statuses, retry_rows};
pub use status::OutcomeStatus;
pub use writer::LogWriter;
