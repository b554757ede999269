//! Catalog manifest writer
//!
//! Writes catalogs in the same schema the loader accepts, so a generated
//! manifest (e.g. a retry set) feeds directly into a new run. The `state`
//! column records provenance and is ignored by the loader.

use std::path::Path;

use crate::entry::CatalogEntry;
use crate::error::{Error, Result};

/// Header written to generated manifests.
pub const MANIFEST_HEADER: [&str; 5] = ["id", "filename", "md5", "size", "state"];

/// One output row: a catalog entry plus an optional provenance annotation.
#[derive(Debug, Clone)]
pub struct ManifestRow {
    pub entry: CatalogEntry,
    /// Provenance marker such as `retry_failed_transfer`; empty cell when `None`.
    pub state: Option<String>,
}

impl ManifestRow {
    pub fn new(entry: CatalogEntry) -> Self {
        Self { entry, state: None }
    }

    pub fn with_state(entry: CatalogEntry, state: impl Into<String>) -> Self {
        Self {
            entry,
            state: Some(state.into()),
        }
    }
}

/// Write `rows` as a tab-separated manifest at `path`.
///
/// # Errors
///
/// Returns an error if the destination cannot be created or written.
pub fn write_manifest(path: &Path, rows: &[ManifestRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;

    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    writer.write_record(MANIFEST_HEADER).map_err(write_err)?;

    for row in rows {
        writer
            .write_record([
                row.entry.id.as_str(),
                row.entry.name.as_str(),
                row.entry.checksum.as_str(),
                row.entry.size_field().as_str(),
                row.state.as_deref().unwrap_or(""),
            ])
            .map_err(write_err)?;
    }

    writer.flush().map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source: csv::Error::from(source),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::read_manifest;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn written_manifest_loads_back_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("retry.tsv");

        let rows = vec![
            ManifestRow::with_state(
                CatalogEntry::new("u1", "a.txt", "abcd", None),
                "retry_failed_transfer",
            ),
            ManifestRow::new(CatalogEntry::new("u2", "b.bam", "ef01", Some(7))),
        ];
        write_manifest(&path, &rows).unwrap();

        let reloaded = read_manifest(&path).unwrap();
        assert_eq!(
            reloaded,
            vec![
                CatalogEntry::new("u1", "a.txt", "abcd", None),
                CatalogEntry::new("u2", "b.bam", "ef01", Some(7)),
            ]
        );
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let err = write_manifest(Path::new("/nonexistent/dir/out.tsv"), &[]).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
