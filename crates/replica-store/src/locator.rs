//! Remote object addressing

use std::fmt;

/// The remote address of a catalog entry: bucket plus the `{id}/{name}` key.
///
/// Derived from an entry and the run's bucket configuration; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub bucket: String,
    pub id: String,
    pub name: String,
}

impl Locator {
    pub fn new(bucket: impl Into<String>, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            id: id.into(),
            name: name.into(),
        }
    }

    /// Object key relative to the bucket root.
    pub fn key(&self) -> String {
        format!("{}/{}", self.id, self.name)
    }

    /// Canonical `bucket/id/name` form, used in logs and diagnostics.
    pub fn uri(&self) -> String {
        format!("{}/{}", self.bucket, self.key())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}
