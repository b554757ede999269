//! Error types for replica-store

use std::path::PathBuf;

/// Result type for replica-store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Closed classification of remote faults.
///
/// Decided once at the client boundary; retry and reporting logic switch on
/// this enum, never on provider error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// 429-equivalent throttling response
    RateLimited,
    /// 5xx-equivalent service fault
    Service,
    /// Transport-level fault: connect, TLS, timeout, interrupted body
    Transport,
    /// Any other remote response with no mapping
    Other,
}

/// Errors that can occur while probing or fetching remote objects.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The remote side (or the path to it) failed; a retry may change the
    /// outcome. The raw provider diagnostic is preserved in `detail`.
    #[error("Remote store error ({kind:?}): {detail}")]
    Remote {
        kind: RemoteErrorKind,
        detail: String,
    },

    /// A local resource failed while receiving bytes; retrying cannot change
    /// a local resource condition.
    #[error("Local resource error at {path}: {source}")]
    Local {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store client itself is misconfigured (bad endpoint, unbuildable
    /// client). Surfaces at construction or address-building time.
    #[error("Store configuration error: {detail}")]
    Config { detail: String },
}

impl StoreError {
    pub fn remote(kind: RemoteErrorKind, detail: impl Into<String>) -> Self {
        Self::Remote {
            kind,
            detail: detail.into(),
        }
    }

    pub fn local(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Local {
            path: path.into(),
            source,
        }
    }

    /// Whether the bounded retry policy may re-attempt after this error.
    ///
    /// Only remote-classified faults are retryable; local resource and
    /// configuration errors fail the operation immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Remote { .. })
    }
}
