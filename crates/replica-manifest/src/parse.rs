//! TSV catalog loading with header-alias resolution
//!
//! Manifests in the wild disagree on column naming, so each semantic field
//! accepts a fixed list of aliases; the first alias present in the header
//! wins. `id`, `name`, and `checksum` are mandatory at the header level;
//! individual rows missing a value are skipped with a warning rather than
//! aborting the load.

use std::path::Path;

use tracing::warn;

use crate::entry::CatalogEntry;
use crate::error::{Error, Result};

const ID_ALIASES: &[&str] = &["id", "uuid", "file_id"];
const NAME_ALIASES: &[&str] = &["filename", "file_name", "name"];
const CHECKSUM_ALIASES: &[&str] = &["md5", "md5sum", "checksum"];
const SIZE_ALIASES: &[&str] = &["size", "file_size"];

/// Resolved header positions for the semantic fields.
struct Columns {
    id: usize,
    name: usize,
    checksum: usize,
    size: Option<usize>,
}

/// Load a tab-separated catalog manifest into the canonical entry list.
///
/// Returns an empty `Vec` when the header parses but no row is valid —
/// callers must treat that as "nothing to do", not as an error.
///
/// # Errors
///
/// Fails when the source is unreadable, the header row is absent, or any of
/// the mandatory `id`/`name`/`checksum` columns has no resolvable alias.
pub fn read_manifest(path: &Path) -> Result<Vec<CatalogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::EmptyHeader {
            path: path.to_path_buf(),
        });
    }

    let columns = resolve_columns(path, &headers)?;
    let mut entries = Vec::new();

    for (index, record) in reader.records().enumerate() {
        // Header is line 1, so data rows start at line 2.
        let line = index + 2;
        let record = record.map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let id = cell(&record, columns.id);
        let name = cell(&record, columns.name);
        let checksum = cell(&record, columns.checksum);

        let (Some(id), Some(name), Some(checksum)) = (id, name, checksum) else {
            warn!(line, "skipping manifest row with missing id, name, or checksum");
            continue;
        };

        let size_hint = columns
            .size
            .and_then(|idx| cell(&record, idx))
            .and_then(|raw| raw.parse::<u64>().ok());

        entries.push(CatalogEntry::new(id, name, checksum, size_hint));
    }

    Ok(entries)
}

/// A trimmed, non-empty cell value, or `None`.
fn cell(record: &csv::StringRecord, index: usize) -> Option<&str> {
    let value = record.get(index)?.trim();
    if value.is_empty() { None } else { Some(value) }
}

fn resolve_columns(path: &Path, headers: &csv::StringRecord) -> Result<Columns> {
    // Aliases are tried in their listed order; the first one present in the
    // header wins, regardless of where the header places it.
    let position = |aliases: &[&str]| {
        aliases
            .iter()
            .find_map(|alias| headers.iter().position(|header| header.trim() == *alias))
    };

    let require = |field: &'static str, aliases: &[&str]| {
        position(aliases).ok_or_else(|| Error::MissingColumn {
            path: path.to_path_buf(),
            field,
            accepted: aliases.join(", "),
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })
    };

    Ok(Columns {
        id: require("id", ID_ALIASES)?,
        name: require("name", NAME_ALIASES)?,
        checksum: require("checksum", CHECKSUM_ALIASES)?,
        size: position(SIZE_ALIASES),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn manifest_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_canonical_columns() {
        let file = manifest_file("id\tfilename\tmd5\tsize\nu1\ta.txt\tABCD\t10\n");
        let entries = read_manifest(file.path()).unwrap();
        assert_eq!(
            entries,
            vec![CatalogEntry::new("u1", "a.txt", "abcd", Some(10))]
        );
    }

    #[test]
    fn resolves_header_aliases() {
        let file = manifest_file("uuid\tfile_name\tmd5sum\nu1\ta.txt\tab\n");
        let entries = read_manifest(file.path()).unwrap();
        assert_eq!(entries[0].id, "u1");
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].checksum, "ab");
        assert_eq!(entries[0].size_hint, None);
    }

    #[test]
    fn earlier_alias_wins_over_header_position() {
        // Both `id` and `uuid` are present; `id` comes first in the alias
        // list, so it wins even though `uuid` appears first in the header.
        let file = manifest_file("uuid\tid\tfilename\tmd5\nA\tB\ta.txt\tab\n");
        let entries = read_manifest(file.path()).unwrap();
        assert_eq!(entries[0].id, "B");
    }

    #[test]
    fn skips_rows_missing_mandatory_values() {
        let file = manifest_file(
            "id\tfilename\tmd5\n\
             u1\ta.txt\tab\n\
             \tb.txt\tcd\n\
             u3\t\tef\n\
             u4\td.txt\t\n\
             u5\te.txt\t12\n",
        );
        let entries = read_manifest(file.path()).unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u5"]);
    }

    #[test]
    fn ignores_unknown_columns() {
        // A retry manifest carries a `state` column; it must load unchanged.
        let file = manifest_file(
            "id\tfilename\tmd5\tsize\tstate\nu1\ta.txt\tab\tN/A\tretry_failed_transfer\n",
        );
        let entries = read_manifest(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size_hint, None);
    }

    #[test]
    fn unparsable_size_becomes_unknown() {
        let file = manifest_file("id\tfilename\tmd5\tsize\nu1\ta.txt\tab\tN/A\n");
        let entries = read_manifest(file.path()).unwrap();
        assert_eq!(entries[0].size_hint, None);
    }

    #[test]
    fn missing_checksum_column_is_fatal() {
        let file = manifest_file("id\tfilename\nu1\ta.txt\n");
        let err = read_manifest(file.path()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { field: "checksum", .. }));
    }

    #[test]
    fn empty_source_is_distinct_error() {
        let file = manifest_file("");
        let err = read_manifest(file.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyHeader { .. }));
    }

    #[test]
    fn header_only_source_yields_empty_working_set() {
        let file = manifest_file("id\tfilename\tmd5\n");
        let entries = read_manifest(file.path()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn unreadable_source_is_fatal() {
        let err = read_manifest(Path::new("/nonexistent/manifest.tsv")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
