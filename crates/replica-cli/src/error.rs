//! Error types for replica-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from replica-core
    #[error(transparent)]
    Core(#[from] replica_core::Error),

    /// Error from replica-manifest
    #[error(transparent)]
    Manifest(#[from] replica_manifest::Error),

    /// Error from replica-log
    #[error(transparent)]
    Log(#[from] replica_log::Error),

    /// Error from replica-store
    #[error(transparent)]
    Store(#[from] replica_store::StoreError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
