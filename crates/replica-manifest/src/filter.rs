//! Filename-extension allow list
//!
//! Filtering happens before any remote traffic: an excluded entry is logged
//! and never probed.

use std::collections::BTreeSet;

use crate::entry::CatalogEntry;

/// Case-insensitive allow list over filename extensions.
///
/// An empty filter admits everything. Extensions are stored lower-cased and
/// without a leading dot, so `"BAM"`, `"bam"`, and `".bam"` all describe the
/// same filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    allowed: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Build a filter from a comma-separated extension list.
    ///
    /// Blank segments are ignored; `parse("")` yields the admit-all filter.
    pub fn parse(spec: &str) -> Self {
        let allowed = spec
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { allowed }
    }

    /// Whether this filter admits everything.
    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Whether `entry`'s filename extension is admitted.
    pub fn admits(&self, entry: &CatalogEntry) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        match entry.extension() {
            Some(ext) => self.allowed.contains(&ext),
            None => false,
        }
    }

    /// Split a catalog into (admitted, excluded), preserving order.
    pub fn partition(&self, entries: Vec<CatalogEntry>) -> (Vec<CatalogEntry>, Vec<CatalogEntry>) {
        entries.into_iter().partition(|entry| self.admits(entry))
    }

    /// Human-readable description for log messages and summaries.
    pub fn describe(&self) -> String {
        if self.allowed.is_empty() {
            "unrestricted".to_string()
        } else {
            self.allowed.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}
