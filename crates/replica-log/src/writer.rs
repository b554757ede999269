//! Append-and-flush outcome log writer
//!
//! Single-writer discipline: an exclusive advisory lock is held for the
//! writer's lifetime, so two runs can never interleave rows in one log. Each
//! record is flushed before `record` returns — a crash mid-run loses at most
//! the in-flight entry, never previously recorded ones.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{LOG_HEADER, OutcomeRecord};

/// Streaming writer for the tab-separated outcome log.
pub struct LogWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    last_timestamp: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for LogWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogWriter")
            .field("path", &self.path)
            .field("last_timestamp", &self.last_timestamp)
            .finish_non_exhaustive()
    }
}

impl LogWriter {
    /// Create (truncating) the log at `path`, write the header, and take the
    /// exclusive lock. Parent directories are created as needed.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        file.try_lock_exclusive().map_err(|_| Error::Locked {
            path: path.to_path_buf(),
        })?;

        let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(file);
        writer.write_record(LOG_HEADER)?;
        writer.flush().map_err(csv::Error::from)?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            last_timestamp: None,
        })
    }

    /// Append one record and flush it to disk before returning.
    ///
    /// Timestamps are clamped to the previous record's value when the wall
    /// clock steps backwards, keeping the log monotonically non-decreasing
    /// within a run.
    pub fn record(&mut self, record: &OutcomeRecord) -> Result<()> {
        let timestamp = match self.last_timestamp {
            Some(last) if record.timestamp < last => last,
            _ => record.timestamp,
        };
        self.last_timestamp = Some(timestamp);

        self.writer.write_record([
            timestamp.to_rfc3339().as_str(),
            record.status.as_str(),
            record.id.as_str(),
            record.name.as_str(),
            record.remote_uri.as_str(),
            record.local_path.as_str(),
            record.expected_checksum.as_str(),
            record.actual_field(),
            record.size_field().as_str(),
            record.message.as_str(),
        ])?;
        self.writer.flush().map_err(csv::Error::from)?;

        debug!(status = %record.status, id = %record.id, "outcome recorded");
        Ok(())
    }

    /// Where this log lives.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
