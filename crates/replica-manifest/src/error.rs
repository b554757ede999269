//! Error types for replica-manifest

use std::path::PathBuf;

/// Result type for replica-manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or writing catalog manifests.
///
/// All variants are load-fatal: they abort the run before any entry is
/// processed. Rows that merely lack a value are skipped with a warning and
/// never surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest source could not be read or parsed at all
    #[error("Cannot read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The manifest has no header row (empty source)
    #[error("Manifest at {path} is empty or has no header row")]
    EmptyHeader { path: PathBuf },

    /// A mandatory semantic column has no resolvable alias in the header
    #[error(
        "Manifest at {path} has no '{field}' column (accepted: {accepted}; header found: {found})"
    )]
    MissingColumn {
        path: PathBuf,
        field: &'static str,
        accepted: String,
        found: String,
    },

    /// The manifest destination could not be written
    #[error("Cannot write manifest at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
