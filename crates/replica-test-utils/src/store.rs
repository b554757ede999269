//! Scripted in-memory object store
//!
//! Each object carries a probe behavior and a fetch behavior, so tests can
//! drive every branch of the pipeline deterministically — including "fail N
//! times, then deliver" for retry accounting — without a network.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use replica_store::{Locator, ObjectStore, Probe, RemoteErrorKind, Result, StoreError};

/// How an object answers existence probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeBehavior {
    Present,
    NotFound,
    Forbidden,
    /// Probe fails with a remote service fault.
    Error,
}

/// How an object answers fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchBehavior {
    /// Deliver the stored bytes.
    Deliver,
    /// Fail every attempt with a remote service fault.
    FailAlways,
    /// Fail the first `n` attempts, then deliver.
    FailTimes(u32),
}

struct ScriptedObject {
    bytes: Vec<u8>,
    probe: ProbeBehavior,
    fetch: FetchBehavior,
    fetch_attempts: u32,
}

/// In-memory [`ObjectStore`] keyed by `{id}/{name}`.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, ScriptedObject>>,
    probe_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a present, deliverable object.
    pub fn put(&self, id: &str, name: &str, bytes: &[u8]) -> &Self {
        self.script(id, name, bytes, ProbeBehavior::Present, FetchBehavior::Deliver)
    }

    /// Register an object that probes as missing.
    pub fn put_missing(&self, id: &str, name: &str) -> &Self {
        self.script(id, name, b"", ProbeBehavior::NotFound, FetchBehavior::Deliver)
    }

    /// Register an object that probes as access-denied.
    pub fn put_forbidden(&self, id: &str, name: &str) -> &Self {
        self.script(id, name, b"", ProbeBehavior::Forbidden, FetchBehavior::Deliver)
    }

    /// Register an object whose probe fails with a remote fault.
    pub fn put_probe_error(&self, id: &str, name: &str) -> &Self {
        self.script(id, name, b"", ProbeBehavior::Error, FetchBehavior::Deliver)
    }

    /// Register a present object whose every fetch fails.
    pub fn put_unfetchable(&self, id: &str, name: &str) -> &Self {
        self.script(id, name, b"", ProbeBehavior::Present, FetchBehavior::FailAlways)
    }

    /// Register a present object whose first `failures` fetches fail, then
    /// delivers `bytes`.
    pub fn put_flaky(&self, id: &str, name: &str, bytes: &[u8], failures: u32) -> &Self {
        self.script(
            id,
            name,
            bytes,
            ProbeBehavior::Present,
            FetchBehavior::FailTimes(failures),
        )
    }

    fn script(
        &self,
        id: &str,
        name: &str,
        bytes: &[u8],
        probe: ProbeBehavior,
        fetch: FetchBehavior,
    ) -> &Self {
        self.objects.lock().unwrap().insert(
            format!("{id}/{name}"),
            ScriptedObject {
                bytes: bytes.to_vec(),
                probe,
                fetch,
                fetch_attempts: 0,
            },
        );
        self
    }

    /// Total probe calls made against this store.
    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    /// Total fetch calls made against this store.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Fetch attempts made against one object.
    pub fn fetch_attempts(&self, id: &str, name: &str) -> u32 {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{id}/{name}"))
            .map(|object| object.fetch_attempts)
            .unwrap_or(0)
    }
}

fn scripted_fault(context: &str, key: &str) -> StoreError {
    StoreError::remote(
        RemoteErrorKind::Service,
        format!("scripted {context} failure for {key}"),
    )
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn probe(&self, locator: &Locator) -> Result<Probe> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        let key = locator.key();
        let objects = self.objects.lock().unwrap();

        let Some(object) = objects.get(&key) else {
            return Ok(Probe::NotFound {
                detail: format!("no such object: {key}"),
            });
        };

        match object.probe {
            ProbeBehavior::Present => Ok(Probe::Found {
                size: Some(object.bytes.len() as u64),
            }),
            ProbeBehavior::NotFound => Ok(Probe::NotFound {
                detail: format!("object not found (scripted): {key}"),
            }),
            ProbeBehavior::Forbidden => Ok(Probe::Forbidden {
                detail: format!("access denied (scripted): {key}"),
            }),
            ProbeBehavior::Error => Err(scripted_fault("probe", &key)),
        }
    }

    async fn fetch(&self, locator: &Locator, target: &Path) -> Result<()> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let key = locator.key();

        let bytes = {
            let mut objects = self.objects.lock().unwrap();
            let Some(object) = objects.get_mut(&key) else {
                return Err(scripted_fault("fetch", &key));
            };
            object.fetch_attempts += 1;

            match object.fetch {
                FetchBehavior::Deliver => object.bytes.clone(),
                FetchBehavior::FailAlways => return Err(scripted_fault("fetch", &key)),
                FetchBehavior::FailTimes(failures) => {
                    if object.fetch_attempts <= failures {
                        return Err(scripted_fault("fetch", &key));
                    }
                    object.bytes.clone()
                }
            }
        };

        tokio::fs::write(target, bytes)
            .await
            .map_err(|err| StoreError::local(target, err))
    }
}
