//! The two-operation object-store trait

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::locator::Locator;

/// Result of a metadata-only existence probe.
///
/// `NotFound` and `Forbidden` are classifications, not errors: they are
/// expected terminal states for an entry and carry the provider diagnostic
/// for the outcome log. Everything else the remote can do wrong surfaces as
/// `Err(StoreError::Remote { .. })`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Object exists and is fetchable.
    Found {
        /// Remote-reported size, when the store exposes one.
        size: Option<u64>,
    },
    /// 404-equivalent: the object does not exist.
    NotFound { detail: String },
    /// 403-equivalent: the object exists behind an access control.
    Forbidden { detail: String },
}

/// A remote object store, reduced to the two operations reconciliation
/// needs. Implementations must be stateless per call so entries can be
/// processed from multiple workers.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Metadata-only existence check. Idempotent, safe to call
    /// speculatively, transfers no object bytes.
    async fn probe(&self, locator: &Locator) -> Result<Probe>;

    /// Download the object's full content to `target`, overwriting any
    /// existing file. The target's parent directory must already exist.
    /// An interrupted fetch may leave a truncated file behind; integrity
    /// verification is the caller's safety net.
    async fn fetch(&self, locator: &Locator, target: &Path) -> Result<()>;
}
