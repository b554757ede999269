//! Transfer execution with bounded fixed-delay retry
//!
//! The per-entry state machine: attempt the fetch; on a retryable remote
//! fault with budget remaining, wait the fixed delay and try again; on a
//! local resource fault, fail immediately — retrying cannot change a local
//! resource condition. Total attempts are `max_retries + 1`.

use std::path::Path;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use replica_store::{Locator, ObjectStore, StoreError};

/// Bounded fixed-delay retry policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Fixed delay between attempts. Blocks only the entry's own task.
    pub delay: Duration,
}

/// Why a transfer ended without verified bytes on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferFailure {
    /// Remote attempts exhausted, or a terminal remote classification.
    Remote { attempts: u32, detail: String },
    /// Local resource fault (directory creation, disk); never retried.
    Local { detail: String },
}

/// Fetch `locator` into `target` under `policy`.
///
/// The target's parent directory is created here, idempotently, immediately
/// before the first attempt — binding directory-creation failures to the
/// entry actually being processed. An interrupted attempt may leave a
/// truncated file; integrity verification is the caller's safety net.
pub async fn transfer(
    store: &dyn ObjectStore,
    locator: &Locator,
    target: &Path,
    policy: &RetryPolicy,
) -> Result<(), TransferFailure> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| TransferFailure::Local {
                detail: format!("cannot create directory {}: {err}", parent.display()),
            })?;
    }

    let budget = policy.max_retries + 1;
    let mut last_detail = String::new();

    for attempt in 1..=budget {
        match store.fetch(locator, target).await {
            Ok(()) => return Ok(()),
            Err(StoreError::Local { path, source }) => {
                return Err(TransferFailure::Local {
                    detail: format!("local write to {} failed: {source}", path.display()),
                });
            }
            Err(err) => {
                last_detail = err.to_string();
                warn!(%locator, attempt, budget, error = %last_detail, "fetch attempt failed");

                if !err.is_retryable() {
                    return Err(TransferFailure::Remote {
                        attempts: attempt,
                        detail: last_detail,
                    });
                }
                if attempt < budget {
                    sleep(policy.delay).await;
                }
            }
        }
    }

    Err(TransferFailure::Remote {
        attempts: budget,
        detail: last_detail,
    })
}
