//! Run summary accumulator
//!
//! An explicit value built up as outcomes arrive and returned by the engine —
//! never shared global state.

use std::collections::BTreeMap;

use serde::Serialize;

use replica_log::OutcomeStatus;

/// One entry needing operator attention: failures, plus remote-existence
/// skips (the object was declared but could not be fetched).
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDetail {
    pub status: OutcomeStatus,
    pub id: String,
    pub name: String,
    pub reason: String,
}

/// Per-status accounting for one run.
///
/// A run is **clean** iff every processed entry ended satisfied
/// (`SUCCESS_VERIFIED` or `SKIPPED_LOCAL_VERIFIED`). Extension-filtered
/// entries are excluded from the clean calculation entirely — they were never
/// transfer candidates — and remote-existence skips make a run not clean
/// without counting toward the failure total.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Valid rows in the loaded manifest.
    pub total_declared: usize,
    /// Entries excluded by the extension filter.
    pub filtered_out: usize,
    counts: BTreeMap<OutcomeStatus, usize>,
    /// Failures and remote-existence skips, in arrival order.
    pub problems: Vec<ProblemDetail>,
}

impl RunSummary {
    pub fn new(total_declared: usize, filtered_out: usize) -> Self {
        Self {
            total_declared,
            filtered_out,
            counts: BTreeMap::new(),
            problems: Vec::new(),
        }
    }

    /// Account one terminal outcome.
    pub fn observe(&mut self, status: OutcomeStatus, id: &str, name: &str, reason: &str) {
        *self.counts.entry(status).or_insert(0) += 1;

        let needs_attention = status.is_failure()
            || matches!(
                status,
                OutcomeStatus::SkippedRemoteNotFound
                    | OutcomeStatus::SkippedRemoteForbidden
                    | OutcomeStatus::SkippedRemoteOtherError
            );
        if needs_attention {
            self.problems.push(ProblemDetail {
                status,
                id: id.to_string(),
                name: name.to_string(),
                reason: reason.to_string(),
            });
        }
    }

    /// Recorded outcomes with the given status.
    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Entries that entered the per-entry pipeline (everything recorded
    /// except extension-filter exclusions).
    pub fn processed(&self) -> usize {
        self.counts
            .iter()
            .filter(|(status, _)| **status != OutcomeStatus::SkippedExtensionFiltered)
            .map(|(_, count)| count)
            .sum()
    }

    /// Outcomes counting as failures (`FAILED_*`).
    pub fn failure_total(&self) -> usize {
        self.counts
            .iter()
            .filter(|(status, _)| status.is_failure())
            .map(|(_, count)| count)
            .sum()
    }

    /// Whether every processed entry ended satisfied. An empty run is clean:
    /// nothing to do is not a problem.
    pub fn is_clean(&self) -> bool {
        self.counts
            .iter()
            .filter(|(status, _)| **status != OutcomeStatus::SkippedExtensionFiltered)
            .all(|(status, _)| status.is_satisfied())
    }

    /// All statuses with a nonzero count, in taxonomy order.
    pub fn nonzero_counts(&self) -> impl Iterator<Item = (OutcomeStatus, usize)> + '_ {
        OutcomeStatus::ALL
            .into_iter()
            .filter_map(|status| match self.count(status) {
                0 => None,
                count => Some((status, count)),
            })
    }
}
