//! Outcome log reading
//!
//! Columns are resolved by header name rather than position, so a log with
//! extra trailing columns still loads. Statuses outside the closed taxonomy
//! are rejected — a foreign or corrupted log must not silently feed the
//! retry loop.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::record::{LOG_HEADER, OutcomeRecord};
use crate::status::OutcomeStatus;

/// Parse an outcome log back into records.
pub fn read_log(path: &Path) -> Result<Vec<OutcomeRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)
        .map_err(|source| csv_io(path, source))?;

    let headers = reader
        .headers()
        .map_err(|source| csv_io(path, source))?
        .clone();

    let column = |name: &'static str| -> Result<usize> {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| Error::MissingColumn {
                path: path.to_path_buf(),
                column: name,
            })
    };

    let timestamp_col = column(LOG_HEADER[0])?;
    let status_col = column(LOG_HEADER[1])?;
    let id_col = column(LOG_HEADER[2])?;
    let name_col = column(LOG_HEADER[3])?;
    let uri_col = column(LOG_HEADER[4])?;
    let local_col = column(LOG_HEADER[5])?;
    let expected_col = column(LOG_HEADER[6])?;
    let actual_col = column(LOG_HEADER[7])?;
    let size_col = column(LOG_HEADER[8])?;
    let message_col = column(LOG_HEADER[9])?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index + 2;
        let row = row.map_err(|source| csv_io(path, source))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").to_string();

        let raw_timestamp = cell(timestamp_col);
        let timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
            .map_err(|_| Error::InvalidTimestamp {
                line,
                value: raw_timestamp.clone(),
            })?
            .with_timezone(&Utc);

        let raw_status = cell(status_col);
        let status: OutcomeStatus = raw_status.parse().map_err(|_| Error::UnknownStatus {
            line,
            value: raw_status.clone(),
        })?;

        let actual = cell(actual_col);
        let size = cell(size_col);

        records.push(OutcomeRecord {
            timestamp,
            status,
            id: cell(id_col),
            name: cell(name_col),
            remote_uri: cell(uri_col),
            local_path: cell(local_col),
            expected_checksum: cell(expected_col),
            actual_checksum: none_if_na(actual),
            size_hint: size.parse::<u64>().ok(),
            message: cell(message_col),
        });
    }

    Ok(records)
}

fn none_if_na(value: String) -> Option<String> {
    if value.is_empty() || value == replica_manifest::NA {
        None
    } else {
        Some(value)
    }
}

fn csv_io(path: &Path, source: csv::Error) -> Error {
    Error::Read {
        path: path.to_path_buf(),
        source,
    }
}
