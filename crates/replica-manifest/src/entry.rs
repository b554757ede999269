//! Catalog entry value type

use serde::{Deserialize, Serialize};

/// Sentinel written to tabular cells whose value is unknown.
pub const NA: &str = "N/A";

/// One declared object in the catalog.
///
/// Identity is `id`; `id` and `name` together determine both the remote key
/// (`{id}/{name}`) and the local target path under the data root. Entries are
/// immutable value types — a loaded entry is never mutated, only consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Opaque content identifier. UUIDs in practice, but never parsed as such.
    pub id: String,

    /// Leaf filename; doubles as the remote key suffix.
    pub name: String,

    /// Expected content digest, trimmed and lower-cased at load time so
    /// downstream comparison is case- and whitespace-insensitive.
    pub checksum: String,

    /// Declared object size, when the manifest carries one. Advisory only.
    pub size_hint: Option<u64>,
}

impl CatalogEntry {
    /// Create an entry, normalizing the checksum.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        checksum: &str,
        size_hint: Option<u64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            checksum: normalize_checksum(checksum),
            size_hint,
        }
    }

    /// Remote key relative to the bucket root.
    pub fn key(&self) -> String {
        format!("{}/{}", self.id, self.name)
    }

    /// Final extension of `name`, lower-cased, without the dot.
    ///
    /// `"sample.SVS"` yields `Some("svs")`; a name with no dot (or nothing
    /// after the last dot) yields `None`.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// The size as written to tabular output (`N/A` when unknown).
    pub fn size_field(&self) -> String {
        match self.size_hint {
            Some(size) => size.to_string(),
            None => NA.to_string(),
        }
    }
}

/// Trim and lower-case a digest so `"AB12"` and `" ab12 "` compare equal.
pub fn normalize_checksum(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}
