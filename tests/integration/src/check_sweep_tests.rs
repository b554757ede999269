//! Probe-only sweep tests

use pretty_assertions::assert_eq;

use replica_core::check_sweep;
use replica_manifest::CatalogEntry;
use replica_test_utils::{MemoryStore, TestReplica};

#[tokio::test]
async fn sweep_counts_present_and_unavailable_objects() {
    let store = MemoryStore::new();
    store.put("u1", "a.txt", b"alpha");
    store.put_missing("u2", "b.txt");
    store.put_forbidden("u3", "c.txt");
    store.put_probe_error("u4", "d.txt");

    let entries = vec![
        CatalogEntry::new("u1", "a.txt", "ab", None),
        CatalogEntry::new("u2", "b.txt", "cd", None),
        CatalogEntry::new("u3", "c.txt", "ef", None),
        CatalogEntry::new("u4", "d.txt", "01", None),
    ];

    let summary = check_sweep(&store, "open-data", &entries, None).await.unwrap();

    assert_eq!(summary.probed, 4);
    assert_eq!(summary.found, 1);
    assert_eq!(summary.problems.len(), 3);
    // A sweep never transfers bytes.
    assert_eq!(store.fetch_calls(), 0);

    let ids: Vec<_> = summary.problems.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["u2", "u3", "u4"]);
}

#[tokio::test]
async fn sweep_writes_a_failures_only_log() {
    let replica = TestReplica::new();
    let store = MemoryStore::new();
    store.put("u1", "present.txt", b"x");
    store.put_missing("u2", "absent.txt");

    let entries = vec![
        CatalogEntry::new("u1", "present.txt", "ab", None),
        CatalogEntry::new("u2", "absent.txt", "cd", None),
    ];

    let log_path = replica.root().join("logs").join("sweep_failures.tsv");
    let summary = check_sweep(&store, "open-data", &entries, Some(&log_path))
        .await
        .unwrap();
    assert_eq!(summary.found, 1);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    // Header plus one row per unavailable object; present objects are absent.
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Timestamp\tUUID\tFilename\tRemote_URI\tMessage");
    assert!(lines[1].contains("u2\tabsent.txt\topen-data/u2/absent.txt"));
    assert!(!content.contains("present.txt"));
}

#[tokio::test]
async fn sweep_over_nothing_is_empty_and_clean() {
    let store = MemoryStore::new();
    let summary = check_sweep(&store, "open-data", &[], None).await.unwrap();
    assert_eq!(summary.probed, 0);
    assert_eq!(summary.found, 0);
    assert!(summary.problems.is_empty());
}
