//! [`TestReplica`] temp-directory fixture for reconciliation scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use replica_log::{OutcomeRecord, read_log};

/// A temporary output root with helpers for test setup and assertion.
///
/// Layout matches a real run: data under `dataset/{id}/{name}`, logs under
/// `logs/`.
pub struct TestReplica {
    temp_dir: TempDir,
}

impl Default for TestReplica {
    fn default() -> Self {
        Self::new()
    }
}

impl TestReplica {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestReplica: failed to create temp dir"),
        }
    }

    /// Root of the temporary output directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a manifest file under the root and return its path.
    pub fn write_manifest(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content).expect("TestReplica: failed to write manifest");
        path
    }

    /// Path of a replicated object (`dataset/{id}/{name}`).
    pub fn data_path(&self, id: &str, name: &str) -> PathBuf {
        self.root().join("dataset").join(id).join(name)
    }

    /// Seed a local replica file, creating its per-id directory.
    pub fn seed_data(&self, id: &str, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.data_path(id, name);
        fs::create_dir_all(path.parent().expect("data path has a parent"))
            .expect("TestReplica: failed to create data dir");
        fs::write(&path, bytes).expect("TestReplica: failed to seed data");
        path
    }

    /// Default log path used by runs rooted here.
    pub fn log_path(&self) -> PathBuf {
        self.root().join("logs").join("replica_log.tsv")
    }

    /// Parse the default outcome log.
    ///
    /// # Panics
    /// Panics when the log is absent or malformed — both are test failures.
    pub fn read_log(&self) -> Vec<OutcomeRecord> {
        read_log(&self.log_path()).expect("TestReplica: failed to read outcome log")
    }

    /// Assert that `id`/`name` exists in the replica with exactly `bytes`.
    pub fn assert_data(&self, id: &str, name: &str, bytes: &[u8]) {
        let path = self.data_path(id, name);
        let actual = fs::read(&path)
            .unwrap_or_else(|err| panic!("expected replica file {}: {err}", path.display()));
        assert_eq!(actual, bytes, "replica content mismatch for {id}/{name}");
    }
}
