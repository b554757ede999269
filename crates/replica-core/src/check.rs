//! Probe-only existence sweep
//!
//! Probes every admitted entry without transferring anything, producing a
//! failures-only log and found/missing counts. Useful before committing to a
//! long transfer run, and for auditing a catalog against a live store.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use replica_manifest::CatalogEntry;
use replica_store::{Locator, ObjectStore, Probe};

use crate::error::{Error, Result};

/// How often (in entries) sweep progress is reported.
const PROGRESS_INTERVAL: usize = 100;

/// One entry that did not probe as present.
#[derive(Debug, Clone, Serialize)]
pub struct CheckProblem {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub message: String,
}

/// Result of a probe-only sweep.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub probed: usize,
    pub found: usize,
    pub problems: Vec<CheckProblem>,
}

/// Probe every entry against `bucket`, optionally appending failures to a
/// tab-separated log at `failures_log` (flushed per row, like the outcome
/// log).
pub async fn check_sweep(
    store: &dyn ObjectStore,
    bucket: &str,
    entries: &[CatalogEntry],
    failures_log: Option<&Path>,
) -> Result<CheckSummary> {
    let mut log = match failures_log {
        Some(path) => Some(FailureLog::create(path)?),
        None => None,
    };

    let mut summary = CheckSummary {
        probed: 0,
        found: 0,
        problems: Vec::new(),
    };

    for (index, entry) in entries.iter().enumerate() {
        if index > 0 && index % PROGRESS_INTERVAL == 0 {
            info!(checked = index, total = entries.len(), "sweep progress");
        }

        let locator = Locator::new(bucket, &entry.id, &entry.name);
        summary.probed += 1;

        let message = match store.probe(&locator).await {
            Ok(Probe::Found { .. }) => {
                summary.found += 1;
                continue;
            }
            Ok(Probe::NotFound { detail }) | Ok(Probe::Forbidden { detail }) => detail,
            Err(err) => err.to_string(),
        };

        warn!(id = %entry.id, name = %entry.name, %message, "object not available");
        if let Some(log) = log.as_mut() {
            log.append(entry, &locator, &message)?;
        }
        summary.problems.push(CheckProblem {
            id: entry.id.clone(),
            name: entry.name.clone(),
            uri: locator.uri(),
            message,
        });
    }

    info!(
        probed = summary.probed,
        found = summary.found,
        missing = summary.problems.len(),
        "sweep finished"
    );
    Ok(summary)
}

/// Failures-only TSV log, flushed per row.
struct FailureLog {
    writer: csv::Writer<std::fs::File>,
}

impl FailureLog {
    fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(file);
        writer
            .write_record(["Timestamp", "UUID", "Filename", "Remote_URI", "Message"])
            .map_err(log_err)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    fn append(&mut self, entry: &CatalogEntry, locator: &Locator, message: &str) -> Result<()> {
        self.writer
            .write_record([
                Utc::now().to_rfc3339().as_str(),
                entry.id.as_str(),
                entry.name.as_str(),
                locator.uri().as_str(),
                message,
            ])
            .map_err(log_err)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn log_err(source: csv::Error) -> Error {
    Error::Log(replica_log::Error::Csv(source))
}
