//! Error types for replica-log

use std::path::PathBuf;

/// Result type for replica-log operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing or reading outcome logs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The log file could not be created or opened
    #[error("Cannot open log at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another process holds the log's exclusive lock
    #[error("Log at {path} is locked by another process")]
    Locked { path: PathBuf },

    /// A record could not be serialized or flushed
    #[error("Cannot write log record: {0}")]
    Csv(#[from] csv::Error),

    /// The log could not be read or parsed
    #[error("Cannot read log at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A log being read is missing one of the expected columns
    #[error("Log at {path} is missing the '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A log row carries a status name outside the closed taxonomy
    #[error("Unknown status {value:?} on log line {line}")]
    UnknownStatus { line: usize, value: String },

    /// A log row carries an unparsable timestamp
    #[error("Invalid timestamp {value:?} on log line {line}")]
    InvalidTimestamp { line: usize, value: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
