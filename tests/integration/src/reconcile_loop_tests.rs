//! End-to-end reconciliation tests
//!
//! These drive the complete closed loop through real files: manifest on disk
//! → engine run → outcome log on disk → retry manifest on disk → second run.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use replica_core::{ConfigFile, ReconcileEngine, RunConfig, RunOverrides, resolve_run_config};
use replica_fs::{ChecksumAlgorithm, hash_bytes};
use replica_log::{OutcomeStatus, default_retry_statuses, read_log, retry_rows};
use replica_manifest::{read_manifest, write_manifest};
use replica_test_utils::{MemoryStore, TestReplica};

fn md5_of(bytes: &[u8]) -> String {
    hash_bytes(bytes, ChecksumAlgorithm::Md5)
}

fn config(replica: &TestReplica, mut overrides: RunOverrides) -> RunConfig {
    overrides.bucket.get_or_insert_with(|| "open-data".into());
    overrides.output_root = Some(replica.root().to_path_buf());
    overrides.retry_delay_secs.get_or_insert(0);
    resolve_run_config(&ConfigFile::default(), overrides).unwrap()
}

// =============================================================================
// Test 1: Complete closed-loop workflow
// =============================================================================

/// The full retry loop:
/// 1. Write a manifest declaring three objects (one will fail to fetch)
/// 2. Run reconciliation; verify replica contents and the outcome log
/// 3. Derive a retry manifest from the log's failure subset
/// 4. "Repair" the remote, run the retry manifest, and verify a clean run
#[tokio::test]
async fn failed_entries_round_trip_through_the_retry_manifest() {
    let replica = TestReplica::new();
    let store = Arc::new(MemoryStore::new());
    store.put("u1", "a.txt", b"alpha");
    store.put("u2", "b.txt", b"beta");
    store.put_unfetchable("u3", "c.txt");

    // Step 1: manifest on disk, loaded through the real parser.
    let manifest_path = replica.write_manifest(
        "manifest.tsv",
        &format!(
            "id\tfilename\tmd5\tsize\n\
             u1\ta.txt\t{}\t5\n\
             u2\tb.txt\t{}\t4\n\
             u3\tc.txt\t{}\tN/A\n",
            md5_of(b"alpha"),
            md5_of(b"beta"),
            md5_of(b"gamma"),
        ),
    );
    let entries = read_manifest(&manifest_path).unwrap();
    assert_eq!(entries.len(), 3);

    // Step 2: first run.
    let engine = ReconcileEngine::new(store.clone(), config(&replica, RunOverrides::default()));
    let summary = engine.run(entries).await.unwrap();

    assert_eq!(summary.count(OutcomeStatus::SuccessVerified), 2);
    assert_eq!(summary.count(OutcomeStatus::FailedTransfer), 1);
    assert!(!summary.is_clean());
    replica.assert_data("u1", "a.txt", b"alpha");
    replica.assert_data("u2", "b.txt", b"beta");

    // Step 3: derive the retry manifest from the on-disk log.
    let records = read_log(&replica.log_path()).unwrap();
    assert_eq!(records.len(), 3);
    let rows = retry_rows(&records, &default_retry_statuses());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entry.id, "u3");
    assert_eq!(rows[0].state.as_deref(), Some("retry_failed_transfer"));

    let retry_path = replica.root().join("retry.tsv");
    write_manifest(&retry_path, &rows).unwrap();

    // Step 4: remote repaired; the retry manifest drives a clean run.
    store.put("u3", "c.txt", b"gamma");
    let retry_entries = read_manifest(&retry_path).unwrap();
    assert_eq!(retry_entries.len(), 1);

    let engine = ReconcileEngine::new(store, config(&replica, RunOverrides::default()));
    let retry_summary = engine.run(retry_entries).await.unwrap();

    assert!(retry_summary.is_clean());
    assert_eq!(retry_summary.count(OutcomeStatus::SuccessVerified), 1);
    replica.assert_data("u3", "c.txt", b"gamma");
}

// =============================================================================
// Test 2: Idempotence through real files
// =============================================================================

/// Running twice with skip-verified enabled and an unchanged remote performs
/// zero transfer attempts the second time.
#[tokio::test]
async fn second_run_is_a_no_op_when_replica_is_verified() {
    let replica = TestReplica::new();
    let store = Arc::new(MemoryStore::new());
    store.put("u1", "a.txt", b"alpha");

    let manifest_path = replica.write_manifest(
        "manifest.tsv",
        &format!("id\tfilename\tmd5\nu1\ta.txt\t{}\n", md5_of(b"alpha")),
    );

    let overrides = RunOverrides {
        skip_verified: Some(true),
        ..RunOverrides::default()
    };

    for expected_status in [
        OutcomeStatus::SuccessVerified,
        OutcomeStatus::SkippedLocalVerified,
    ] {
        let entries = read_manifest(&manifest_path).unwrap();
        let engine = ReconcileEngine::new(store.clone(), config(&replica, overrides.clone()));
        let summary = engine.run(entries).await.unwrap();

        assert!(summary.is_clean());
        assert_eq!(summary.count(expected_status), 1);
    }
    assert_eq!(store.fetch_calls(), 1);
}

// =============================================================================
// Test 3: Log survives as the persisted-state format
// =============================================================================

/// The outcome log a run writes is directly consumable: statuses, sentinels,
/// and identity columns all survive the disk round trip.
#[tokio::test]
async fn outcome_log_round_trips_identity_and_sentinels() {
    let replica = TestReplica::new();
    let store = Arc::new(MemoryStore::new());
    store.put_missing("u1", "gone.bam");
    store.put("u2", "ok.bam", b"data");

    let overrides = RunOverrides {
        extensions: Some("bam".into()),
        ..RunOverrides::default()
    };
    let entries = vec![
        replica_manifest::CatalogEntry::new("u1", "gone.bam", "ABCD", Some(11)),
        replica_manifest::CatalogEntry::new("u2", "ok.bam", &md5_of(b"data"), None),
        replica_manifest::CatalogEntry::new("u3", "slide.svs", "ef01", None),
    ];

    let engine = ReconcileEngine::new(store, config(&replica, overrides));
    engine.run(entries).await.unwrap();

    let records = replica.read_log();
    assert_eq!(records.len(), 3);

    let filtered = records
        .iter()
        .find(|r| r.status == OutcomeStatus::SkippedExtensionFiltered)
        .unwrap();
    assert_eq!(filtered.id, "u3");
    assert_eq!(filtered.actual_checksum, None);

    let missing = records
        .iter()
        .find(|r| r.status == OutcomeStatus::SkippedRemoteNotFound)
        .unwrap();
    assert_eq!(missing.id, "u1");
    // Checksum was normalized at load time and survives the log round trip.
    assert_eq!(missing.expected_checksum, "abcd");
    assert_eq!(missing.size_hint, Some(11));
    assert_eq!(missing.remote_uri, "open-data/u1/gone.bam");

    // Timestamps are monotonically non-decreasing in file order.
    for pair in records.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}
