//! Remote object-store access for Replica Manager
//!
//! The store surface is deliberately two operations — a metadata-only
//! existence probe and a full-content fetch — so any object-storage service
//! exposing those semantics can sit behind the [`ObjectStore`] trait. All
//! provider faults are classified once, at the client boundary, into the
//! closed [`StoreError`] shape; nothing downstream ever inspects a raw
//! provider error string.

pub mod error;
pub mod http;
pub mod locator;
pub mod store;

pub use error::{RemoteErrorKind, Result, StoreError};
pub use http::{HttpStore, HttpStoreConfig};
pub use locator::Locator;
pub use store::{ObjectStore, Probe};
