//! Error types for replica-core

use std::path::PathBuf;

/// Result type for replica-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a run.
///
/// Everything here is run-fatal. Per-entry faults never surface as errors —
/// they become outcome records and the run proceeds to the next entry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or incomplete run configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The configuration file could not be read
    #[error("Cannot read config at {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed
    #[error("Invalid config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A worker task died instead of returning an outcome
    #[error("Worker task failed: {detail}")]
    Worker { detail: String },

    /// Manifest loading error from replica-manifest
    #[error(transparent)]
    Manifest(#[from] replica_manifest::Error),

    /// Outcome log error from replica-log
    #[error(transparent)]
    Log(#[from] replica_log::Error),

    /// Store construction/configuration error from replica-store
    #[error(transparent)]
    Store(#[from] replica_store::StoreError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
