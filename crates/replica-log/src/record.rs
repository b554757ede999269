//! Outcome record value type

use chrono::{DateTime, Utc};

use replica_manifest::{CatalogEntry, NA};

use crate::status::OutcomeStatus;

/// Column order of the on-disk log. `read_log` resolves columns by name, so
/// extra trailing columns in a foreign log are tolerated; these exact names
/// are what the writer produces.
pub const LOG_HEADER: [&str; 10] = [
    "Timestamp",
    "Status",
    "UUID",
    "Filename",
    "Remote_URI",
    "Local_Path",
    "Expected_Checksum",
    "Actual_Checksum",
    "Size",
    "Message",
];

/// One terminal outcome for one catalog entry. Append-only: never mutated
/// after being written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub timestamp: DateTime<Utc>,
    pub status: OutcomeStatus,
    pub id: String,
    pub name: String,
    pub remote_uri: String,
    pub local_path: String,
    pub expected_checksum: String,
    /// `None` when no digest was computed for this outcome.
    pub actual_checksum: Option<String>,
    /// Advisory size from the manifest; `None` when unknown.
    pub size_hint: Option<u64>,
    pub message: String,
}

impl OutcomeRecord {
    /// Start a record for `entry` with the current wall-clock time.
    pub fn for_entry(
        entry: &CatalogEntry,
        status: OutcomeStatus,
        remote_uri: impl Into<String>,
        local_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            status,
            id: entry.id.clone(),
            name: entry.name.clone(),
            remote_uri: remote_uri.into(),
            local_path: local_path.into(),
            expected_checksum: entry.checksum.clone(),
            actual_checksum: None,
            size_hint: entry.size_hint,
            message: message.into(),
        }
    }

    /// Attach the digest actually computed for this outcome.
    pub fn with_actual_checksum(mut self, actual: impl Into<String>) -> Self {
        self.actual_checksum = Some(actual.into());
        self
    }

    /// The actual checksum as written to the log (`N/A` when not computed).
    pub fn actual_field(&self) -> &str {
        self.actual_checksum.as_deref().unwrap_or(NA)
    }

    /// The size as written to the log (`N/A` when unknown).
    pub fn size_field(&self) -> String {
        match self.size_hint {
            Some(size) => size.to_string(),
            None => NA.to_string(),
        }
    }

    /// Rebuild a catalog entry from this record's identity columns.
    ///
    /// Size is not recoverable from the log and is marked unknown.
    pub fn to_entry(&self) -> CatalogEntry {
        CatalogEntry::new(&self.id, &self.name, &self.expected_checksum, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_identity_and_checksum() {
        let entry = CatalogEntry::new("u1", "a.txt", "abcd", Some(10));
        let record = OutcomeRecord::for_entry(
            &entry,
            OutcomeStatus::FailedTransfer,
            "bucket/u1/a.txt",
            "/data/u1/a.txt",
            "attempts exhausted",
        );

        let rebuilt = record.to_entry();
        assert_eq!(rebuilt.id, "u1");
        assert_eq!(rebuilt.name, "a.txt");
        assert_eq!(rebuilt.checksum, "abcd");
        // Size is advisory and not recoverable from the log.
        assert_eq!(rebuilt.size_hint, None);
    }

    #[test]
    fn sentinel_fields_use_na() {
        let entry = CatalogEntry::new("u1", "a.txt", "abcd", None);
        let record = OutcomeRecord::for_entry(
            &entry,
            OutcomeStatus::SkippedRemoteNotFound,
            "bucket/u1/a.txt",
            "/data/u1/a.txt",
            "",
        );
        assert_eq!(record.actual_field(), "N/A");
        assert_eq!(record.size_field(), "N/A");
    }
}
