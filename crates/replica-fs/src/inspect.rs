//! Local replica state inspection and post-transfer verification
//!
//! Both operations are strictly read-only: deciding that a stale file must be
//! overwritten is the transfer layer's job, never the inspector's.

use std::path::Path;

use tracing::debug;

use crate::checksum::{ChecksumAlgorithm, hash_file};

/// What the local filesystem already holds for an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalState {
    /// No file at the target path.
    Absent,
    /// File exists and its full-content digest equals the expected one.
    PresentVerified,
    /// File exists but its content differs (or was not checked because the
    /// caller does not intend to skip verified files).
    PresentMismatched {
        /// Digest actually computed, when one was.
        actual: Option<String>,
    },
    /// File exists but its content could not be assessed.
    Unreadable { reason: String },
}

/// Outcome of post-transfer integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Content matches the declared digest.
    Match,
    /// Content is wrong.
    Mismatch { actual: String },
    /// Content could not be assessed — distinct from wrong content.
    ReadError { reason: String },
}

/// Inspect the local target path against the expected digest.
///
/// Hashing is performed only when `verify_existing` is set: when the caller
/// will re-transfer regardless, computing a digest of a file about to be
/// overwritten is wasted I/O, so an existing file is reported as
/// `PresentMismatched { actual: None }` without touching its contents.
pub fn inspect(
    path: &Path,
    expected: &str,
    algorithm: ChecksumAlgorithm,
    verify_existing: bool,
) -> LocalState {
    if !path.exists() {
        return LocalState::Absent;
    }

    if !verify_existing {
        return LocalState::PresentMismatched { actual: None };
    }

    match verify(path, expected, algorithm) {
        Verification::Match => LocalState::PresentVerified,
        Verification::Mismatch { actual } => LocalState::PresentMismatched {
            actual: Some(actual),
        },
        Verification::ReadError { reason } => LocalState::Unreadable { reason },
    }
}

/// Verify a file's full-content digest against the expected value.
///
/// Comparison is case- and whitespace-insensitive on the expected side; the
/// computed digest is already lower-cased hex.
pub fn verify(path: &Path, expected: &str, algorithm: ChecksumAlgorithm) -> Verification {
    let expected = expected.trim().to_ascii_lowercase();
    match hash_file(path, algorithm) {
        Ok(actual) if actual == expected => {
            debug!(path = %path.display(), %algorithm, "checksum verified");
            Verification::Match
        }
        Ok(actual) => Verification::Mismatch { actual },
        Err(err) => Verification::ReadError {
            reason: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::hash_bytes;
    use std::fs;
    use tempfile::tempdir;

    const ALGO: ChecksumAlgorithm = ChecksumAlgorithm::Md5;

    #[test]
    fn absent_file_reports_absent() {
        let dir = tempdir().unwrap();
        let state = inspect(&dir.path().join("missing"), "ab", ALGO, true);
        assert_eq!(state, LocalState::Absent);
    }

    #[test]
    fn matching_file_is_present_verified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"content").unwrap();

        let expected = hash_bytes(b"content", ALGO);
        assert_eq!(inspect(&path, &expected, ALGO, true), LocalState::PresentVerified);
    }

    #[test]
    fn expected_digest_comparison_ignores_case_and_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"content").unwrap();

        let expected = format!("  {}  ", hash_bytes(b"content", ALGO).to_ascii_uppercase());
        assert_eq!(verify(&path, &expected, ALGO), Verification::Match);
    }

    #[test]
    fn stale_file_is_present_mismatched_with_actual() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"stale").unwrap();

        let expected = hash_bytes(b"fresh", ALGO);
        match inspect(&path, &expected, ALGO, true) {
            LocalState::PresentMismatched { actual: Some(actual) } => {
                assert_eq!(actual, hash_bytes(b"stale", ALGO));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn existing_file_is_not_hashed_when_policy_is_off() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"whatever").unwrap();

        let expected = hash_bytes(b"whatever", ALGO);
        // Even a matching file reports mismatched (with no digest computed)
        // when the caller will not use the verification result.
        assert_eq!(
            inspect(&path, &expected, ALGO, false),
            LocalState::PresentMismatched { actual: None }
        );
    }

    #[test]
    fn one_extra_byte_is_a_mismatch_not_a_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"x").unwrap();

        // The empty-input digest: a one-byte file must mismatch it.
        match verify(&path, "d41d8cd98f00b204e9800998ecf8427e", ALGO) {
            Verification::Mismatch { actual } => {
                assert_eq!(actual, hash_bytes(b"x", ALGO));
            }
            other => panic!("unexpected verification: {other:?}"),
        }
    }

    #[test]
    fn zero_byte_file_matches_the_empty_digest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();

        assert_eq!(
            verify(&path, "d41d8cd98f00b204e9800998ecf8427e", ALGO),
            Verification::Match
        );
    }

    #[test]
    fn unassessable_content_is_a_read_error() {
        // A directory at the target path exists but cannot be hashed.
        let dir = tempdir().unwrap();
        let path = dir.path().join("actually-a-dir");
        fs::create_dir(&path).unwrap();

        assert!(matches!(verify(&path, "ab", ALGO), Verification::ReadError { .. }));
        assert!(matches!(
            inspect(&path, "ab", ALGO, true),
            LocalState::Unreadable { .. }
        ));
    }
}
