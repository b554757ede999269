//! The reconciliation engine
//!
//! Per-entry pipeline: local inspection, remote probe, bounded-retry
//! transfer, integrity verification, outcome recording. Entries are
//! independent units of work dispatched onto at most `concurrency` tasks;
//! the recorder sits behind a mutex so appends never interleave, and no
//! operation requires cross-entry ordering.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use replica_fs::{LocalState, Verification, inspect, verify};
use replica_log::{LogWriter, OutcomeRecord, OutcomeStatus};
use replica_manifest::CatalogEntry;
use replica_store::{ObjectStore, Probe};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::progress::{ProgressEvent, ProgressSender};
use crate::summary::RunSummary;
use crate::transfer::{TransferFailure, transfer};

/// Reconciles a catalog against an object store and the local filesystem.
pub struct ReconcileEngine {
    store: Arc<dyn ObjectStore>,
    config: Arc<RunConfig>,
    cancel: Arc<AtomicBool>,
    progress: Option<ProgressSender>,
}

impl ReconcileEngine {
    pub fn new(store: Arc<dyn ObjectStore>, config: RunConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            cancel: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }

    /// Attach a progress subscriber.
    pub fn with_progress(mut self, sender: ProgressSender) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Shared cancellation flag. Setting it stops the run before the next
    /// entry is dispatched; in-flight transfers may be abandoned, leaving
    /// partial files the next run's verification will flag.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Reconcile `entries`, writing one terminal record per entry to the
    /// configured log, and return the run's accounting.
    ///
    /// # Errors
    ///
    /// Only infrastructure faults surface here: the log cannot be created or
    /// appended, or a worker task dies. Per-entry faults are absorbed into
    /// outcome records.
    pub async fn run(&self, entries: Vec<CatalogEntry>) -> Result<RunSummary> {
        let total_declared = entries.len();
        let (admitted, excluded) = self.config.extensions.partition(entries);

        info!(
            declared = total_declared,
            admitted = admitted.len(),
            excluded = excluded.len(),
            log = %self.config.log_path().display(),
            "reconciliation started"
        );

        let mut writer = LogWriter::create(&self.config.log_path())?;
        let mut summary = RunSummary::new(total_declared, excluded.len());

        // Filtered entries are recorded up front; no remote traffic for them.
        for entry in &excluded {
            let message = format!(
                "extension not in allowed set ({})",
                self.config.extensions.describe()
            );
            let record = OutcomeRecord::for_entry(
                entry,
                OutcomeStatus::SkippedExtensionFiltered,
                self.config.locator(entry).uri(),
                self.config.local_target(entry).display().to_string(),
                &message,
            );
            writer.record(&record)?;
            summary.observe(record.status, &entry.id, &entry.name, &message);
        }

        let writer = Arc::new(Mutex::new(writer));
        let limiter = Arc::new(Semaphore::new(self.config.concurrency));
        let total = admitted.len();
        let mut tasks: JoinSet<Result<EntryOutcome>> = JoinSet::new();

        for (index, entry) in admitted.into_iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                warn!(
                    remaining = total - index,
                    "cancellation requested; remaining entries not dispatched"
                );
                break;
            }

            let Ok(permit) = Arc::clone(&limiter).acquire_owned().await else {
                break;
            };

            let context = EntryContext {
                store: Arc::clone(&self.store),
                config: Arc::clone(&self.config),
                writer: Arc::clone(&writer),
                progress: self.progress.clone(),
                index: index + 1,
                total,
            };
            tasks.spawn(async move {
                let _permit = permit;
                process_entry(context, entry).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|err| Error::Worker {
                detail: err.to_string(),
            })??;
            summary.observe(outcome.status, &outcome.id, &outcome.name, &outcome.message);
        }

        self.emit(ProgressEvent::RunFinished {
            processed: summary.processed(),
        });
        info!(
            processed = summary.processed(),
            failures = summary.failure_total(),
            clean = summary.is_clean(),
            "reconciliation finished"
        );
        Ok(summary)
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sender) = &self.progress {
            let _ = sender.send(event);
        }
    }
}

/// Everything a worker needs to process one entry.
struct EntryContext {
    store: Arc<dyn ObjectStore>,
    config: Arc<RunConfig>,
    writer: Arc<Mutex<LogWriter>>,
    progress: Option<ProgressSender>,
    index: usize,
    total: usize,
}

impl EntryContext {
    fn emit(&self, event: ProgressEvent) {
        if let Some(sender) = &self.progress {
            let _ = sender.send(event);
        }
    }
}

/// The terminal result a worker hands back for accounting.
struct EntryOutcome {
    status: OutcomeStatus,
    id: String,
    name: String,
    message: String,
}

async fn process_entry(context: EntryContext, entry: CatalogEntry) -> Result<EntryOutcome> {
    context.emit(ProgressEvent::EntryStarted {
        index: context.index,
        total: context.total,
        id: entry.id.clone(),
        name: entry.name.clone(),
    });

    let record = evaluate_entry(&context, &entry).await;
    context.writer.lock().await.record(&record)?;

    context.emit(ProgressEvent::EntryFinished {
        index: context.index,
        total: context.total,
        id: entry.id.clone(),
        name: entry.name.clone(),
        status: record.status,
    });

    Ok(EntryOutcome {
        status: record.status,
        id: record.id,
        name: record.name,
        message: record.message,
    })
}

/// Run one entry through inspect → probe → transfer → verify and produce its
/// terminal record. Every fault is absorbed here; nothing escapes the entry
/// boundary.
async fn evaluate_entry(context: &EntryContext, entry: &CatalogEntry) -> OutcomeRecord {
    let config = &context.config;
    let locator = config.locator(entry);
    let target = config.local_target(entry);
    let uri = locator.uri();
    let target_display = target.display().to_string();

    let outcome = |status: OutcomeStatus, message: String| {
        OutcomeRecord::for_entry(entry, status, &uri, &target_display, message)
    };

    // Local inspection first: a verified replica needs no remote traffic.
    match inspect(&target, &entry.checksum, config.algorithm, config.skip_verified) {
        LocalState::PresentVerified => {
            debug!(id = %entry.id, "local replica already matches");
            return outcome(
                OutcomeStatus::SkippedLocalVerified,
                "local file exists and checksum matches".to_string(),
            )
            .with_actual_checksum(&entry.checksum);
        }
        LocalState::Unreadable { reason } => {
            return outcome(
                OutcomeStatus::FailedChecksumReadError,
                format!("cannot assess existing local file: {reason}"),
            );
        }
        LocalState::PresentMismatched { actual } => {
            debug!(id = %entry.id, ?actual, "stale local file will be overwritten");
        }
        LocalState::Absent => {}
    }

    match context.store.probe(&locator).await {
        Ok(Probe::Found { size }) => {
            debug!(id = %entry.id, ?size, "remote object present");
        }
        Ok(Probe::NotFound { detail }) => {
            return outcome(OutcomeStatus::SkippedRemoteNotFound, detail);
        }
        Ok(Probe::Forbidden { detail }) => {
            return outcome(OutcomeStatus::SkippedRemoteForbidden, detail);
        }
        Err(err) => {
            return outcome(OutcomeStatus::SkippedRemoteOtherError, err.to_string());
        }
    }

    if let Err(failure) = transfer(
        context.store.as_ref(),
        &locator,
        &target,
        &config.retry_policy(),
    )
    .await
    {
        return match failure {
            TransferFailure::Local { detail } => outcome(OutcomeStatus::FailedLocalResource, detail),
            TransferFailure::Remote { attempts, detail } => outcome(
                OutcomeStatus::FailedTransfer,
                format!("transfer failed after {attempts} attempt(s): {detail}"),
            ),
        };
    }

    match verify(&target, &entry.checksum, config.algorithm) {
        Verification::Match => outcome(
            OutcomeStatus::SuccessVerified,
            "transferred and checksum verified".to_string(),
        )
        .with_actual_checksum(&entry.checksum),
        Verification::Mismatch { actual } => outcome(
            OutcomeStatus::FailedIntegrityMismatch,
            format!(
                "transferred but checksum mismatched (expected {}, got {actual})",
                entry.checksum
            ),
        )
        .with_actual_checksum(actual),
        Verification::ReadError { reason } => outcome(
            OutcomeStatus::FailedChecksumReadError,
            format!("cannot assess transferred file: {reason}"),
        ),
    }
}
