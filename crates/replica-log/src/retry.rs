//! Retry-set generation from a prior outcome log
//!
//! Filters a log to its failure subset and reconstructs catalog entries from
//! the identity columns, annotated with `retry_<original_status>` provenance.
//! The resulting manifest feeds directly into a new run.

use tracing::debug;

use replica_manifest::ManifestRow;

use crate::record::OutcomeRecord;
use crate::status::OutcomeStatus;

/// The default failure set: transfer and existence failures.
///
/// Extension-filter skips are intentional exclusions, not failures, and the
/// two satisfied statuses never need retrying.
pub fn default_retry_statuses() -> Vec<OutcomeStatus> {
    vec![
        OutcomeStatus::FailedTransfer,
        OutcomeStatus::FailedIntegrityMismatch,
        OutcomeStatus::FailedChecksumReadError,
        OutcomeStatus::FailedLocalResource,
        OutcomeStatus::SkippedRemoteNotFound,
        OutcomeStatus::SkippedRemoteForbidden,
        OutcomeStatus::SkippedRemoteOtherError,
    ]
}

/// Derive retry-manifest rows from `records`.
///
/// Entries keep the log's id/name/checksum; size is not recoverable from the
/// log and is marked unknown. An empty result is a valid "nothing to retry"
/// outcome — callers report it informationally, never as an error.
pub fn retry_rows(
    records: &[OutcomeRecord],
    failure_statuses: &[OutcomeStatus],
) -> Vec<ManifestRow> {
    let rows: Vec<ManifestRow> = records
        .iter()
        .filter(|record| failure_statuses.contains(&record.status))
        .map(|record| {
            ManifestRow::with_state(
                record.to_entry(),
                format!("retry_{}", record.status.as_str().to_ascii_lowercase()),
            )
        })
        .collect();

    debug!(
        total = records.len(),
        retryable = rows.len(),
        "retry set derived from log"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use replica_manifest::CatalogEntry;

    fn record(id: &str, status: OutcomeStatus) -> OutcomeRecord {
        let entry = CatalogEntry::new(id, format!("{id}.txt"), "abcd", Some(9));
        OutcomeRecord::for_entry(&entry, status, "b/x", "/d/x", "")
    }

    #[test]
    fn default_set_selects_failures_and_existence_skips_only() {
        let records = vec![
            record("u1", OutcomeStatus::SuccessVerified),
            record("u2", OutcomeStatus::FailedTransfer),
            record("u3", OutcomeStatus::SkippedRemoteNotFound),
            record("u4", OutcomeStatus::SkippedExtensionFiltered),
            record("u5", OutcomeStatus::SkippedLocalVerified),
        ];

        let rows = retry_rows(&records, &default_retry_statuses());
        let ids: Vec<_> = rows.iter().map(|row| row.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u3"]);
    }

    #[test]
    fn provenance_marks_the_original_status() {
        let records = vec![record("u1", OutcomeStatus::FailedIntegrityMismatch)];
        let rows = retry_rows(&records, &default_retry_statuses());
        assert_eq!(
            rows[0].state.as_deref(),
            Some("retry_failed_integrity_mismatch")
        );
    }

    #[test]
    fn caller_supplied_set_overrides_the_default() {
        let records = vec![
            record("u1", OutcomeStatus::FailedTransfer),
            record("u2", OutcomeStatus::SkippedRemoteNotFound),
        ];
        let rows = retry_rows(&records, &[OutcomeStatus::FailedTransfer]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.id, "u1");
    }

    #[test]
    fn no_failures_means_empty_retry_set() {
        let records = vec![record("u1", OutcomeStatus::SuccessVerified)];
        assert!(retry_rows(&records, &default_retry_statuses()).is_empty());
    }

    #[test]
    fn size_is_unknown_in_regenerated_entries() {
        let records = vec![record("u1", OutcomeStatus::FailedTransfer)];
        let rows = retry_rows(&records, &default_retry_statuses());
        assert_eq!(rows[0].entry.size_hint, None);
    }
}
