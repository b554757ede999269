//! Terminal status taxonomy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Terminal status of one processed catalog entry.
///
/// Every entry that enters the per-entry pipeline produces exactly one of
/// these before the next entry begins. The serialized names below are the
/// on-disk log format and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutcomeStatus {
    /// Transferred and checksum-verified.
    #[serde(rename = "SUCCESS_VERIFIED")]
    SuccessVerified,

    /// Local replica already matched; no transfer attempted.
    #[serde(rename = "SKIPPED_LOCAL_VERIFIED")]
    SkippedLocalVerified,

    /// Excluded by the extension filter before any remote traffic.
    #[serde(rename = "SKIPPED_EXTENSION_FILTERED")]
    SkippedExtensionFiltered,

    /// Probe classified the object as absent (404-equivalent).
    #[serde(rename = "SKIPPED_REMOTE_NOT_FOUND")]
    SkippedRemoteNotFound,

    /// Probe classified the object as access-denied (403-equivalent).
    #[serde(rename = "SKIPPED_REMOTE_FORBIDDEN")]
    SkippedRemoteForbidden,

    /// Probe failed with any other remote fault.
    #[serde(rename = "SKIPPED_REMOTE_OTHER_ERROR")]
    SkippedRemoteOtherError,

    /// Transfer attempts exhausted (or terminal remote fault mid-fetch).
    #[serde(rename = "FAILED_TRANSFER")]
    FailedTransfer,

    /// Transferred bytes do not match the declared checksum.
    #[serde(rename = "FAILED_INTEGRITY_MISMATCH")]
    FailedIntegrityMismatch,

    /// Local content could not be assessed (read fault while hashing).
    #[serde(rename = "FAILED_CHECKSUM_READ_ERROR")]
    FailedChecksumReadError,

    /// Local resource fault (directory creation, disk); never retried.
    #[serde(rename = "FAILED_LOCAL_RESOURCE")]
    FailedLocalResource,
}

impl OutcomeStatus {
    /// All statuses, in display order.
    pub const ALL: [OutcomeStatus; 10] = [
        OutcomeStatus::SuccessVerified,
        OutcomeStatus::SkippedLocalVerified,
        OutcomeStatus::SkippedExtensionFiltered,
        OutcomeStatus::SkippedRemoteNotFound,
        OutcomeStatus::SkippedRemoteForbidden,
        OutcomeStatus::SkippedRemoteOtherError,
        OutcomeStatus::FailedTransfer,
        OutcomeStatus::FailedIntegrityMismatch,
        OutcomeStatus::FailedChecksumReadError,
        OutcomeStatus::FailedLocalResource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::SuccessVerified => "SUCCESS_VERIFIED",
            OutcomeStatus::SkippedLocalVerified => "SKIPPED_LOCAL_VERIFIED",
            OutcomeStatus::SkippedExtensionFiltered => "SKIPPED_EXTENSION_FILTERED",
            OutcomeStatus::SkippedRemoteNotFound => "SKIPPED_REMOTE_NOT_FOUND",
            OutcomeStatus::SkippedRemoteForbidden => "SKIPPED_REMOTE_FORBIDDEN",
            OutcomeStatus::SkippedRemoteOtherError => "SKIPPED_REMOTE_OTHER_ERROR",
            OutcomeStatus::FailedTransfer => "FAILED_TRANSFER",
            OutcomeStatus::FailedIntegrityMismatch => "FAILED_INTEGRITY_MISMATCH",
            OutcomeStatus::FailedChecksumReadError => "FAILED_CHECKSUM_READ_ERROR",
            OutcomeStatus::FailedLocalResource => "FAILED_LOCAL_RESOURCE",
        }
    }

    /// Whether this status counts toward the run's failure total.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            OutcomeStatus::FailedTransfer
                | OutcomeStatus::FailedIntegrityMismatch
                | OutcomeStatus::FailedChecksumReadError
                | OutcomeStatus::FailedLocalResource
        )
    }

    /// Whether this status means the entry is satisfied locally.
    pub fn is_satisfied(&self) -> bool {
        matches!(
            self,
            OutcomeStatus::SuccessVerified | OutcomeStatus::SkippedLocalVerified
        )
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutcomeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutcomeStatus::ALL
            .iter()
            .find(|status| status.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("unknown outcome status: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_round_trips_through_its_name() {
        for status in OutcomeStatus::ALL {
            assert_eq!(status.as_str().parse::<OutcomeStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("FAILED_UNKNOWN".parse::<OutcomeStatus>().is_err());
    }

    #[test]
    fn failure_and_satisfied_partitions_are_disjoint() {
        for status in OutcomeStatus::ALL {
            assert!(!(status.is_failure() && status.is_satisfied()));
        }
        assert!(OutcomeStatus::FailedTransfer.is_failure());
        assert!(OutcomeStatus::SkippedLocalVerified.is_satisfied());
        assert!(!OutcomeStatus::SkippedRemoteNotFound.is_failure());
    }
}
