//! Run configuration
//!
//! Settings merge in a fixed hierarchy: built-in defaults, then an optional
//! `replica.toml`, then caller overrides (CLI flags). The resolved
//! [`RunConfig`] is an explicit value handed to the engine — no global state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use replica_fs::ChecksumAlgorithm;
use replica_manifest::{CatalogEntry, ExtensionFilter};
use replica_store::Locator;

use crate::error::{Error, Result};
use crate::transfer::RetryPolicy;

/// Default object-store endpoint (public S3 path-style access).
pub const DEFAULT_ENDPOINT: &str = "https://s3.amazonaws.com";

const DEFAULT_DATA_SUBDIR: &str = "dataset";
const DEFAULT_LOG_SUBDIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "replica_log.tsv";
const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// On-disk configuration file (`replica.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub store: StoreSection,
    pub run: RunSection,
    pub paths: PathsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// Base endpoint, e.g. `https://s3.amazonaws.com`.
    pub endpoint: Option<String>,
    /// Bucket holding the catalog's objects.
    pub bucket: Option<String>,
    /// Name of an environment variable holding a bearer token. The token
    /// itself never lives in the file.
    pub token_env: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    pub retries: Option<u32>,
    pub retry_delay_secs: Option<u64>,
    pub concurrency: Option<usize>,
    pub skip_verified: Option<bool>,
    /// Comma-separated extension allow list, e.g. `"bam,svs"`.
    pub extensions: Option<String>,
    pub algorithm: Option<ChecksumAlgorithm>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    pub data_subdir: Option<String>,
    pub log_subdir: Option<String>,
    pub log_file: Option<String>,
}

impl ConfigFile {
    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if it exists; defaults otherwise.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Caller-side overrides, typically CLI flags. `None` defers to the file /
/// defaults layer.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub token: Option<String>,
    pub output_root: Option<PathBuf>,
    pub extensions: Option<String>,
    pub skip_verified: Option<bool>,
    pub algorithm: Option<ChecksumAlgorithm>,
    pub max_retries: Option<u32>,
    pub retry_delay_secs: Option<u64>,
    pub concurrency: Option<usize>,
    pub log_file: Option<String>,
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub endpoint: String,
    pub bucket: String,
    pub token: Option<String>,
    /// Base output directory; data and logs live in subdirectories of it.
    pub output_root: PathBuf,
    pub data_subdir: String,
    pub log_subdir: String,
    pub log_file: String,
    pub extensions: ExtensionFilter,
    pub skip_verified: bool,
    pub algorithm: ChecksumAlgorithm,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub concurrency: usize,
}

impl RunConfig {
    /// Directory holding the replicated objects (`{root}/{data_subdir}`).
    pub fn data_dir(&self) -> PathBuf {
        self.output_root.join(&self.data_subdir)
    }

    /// Full path of the outcome log.
    pub fn log_path(&self) -> PathBuf {
        self.output_root.join(&self.log_subdir).join(&self.log_file)
    }

    /// Remote locator for an entry.
    pub fn locator(&self, entry: &CatalogEntry) -> Locator {
        Locator::new(&self.bucket, &entry.id, &entry.name)
    }

    /// Local target path for an entry (`{data_dir}/{id}/{name}`). The
    /// per-entry directory is created lazily by the transfer layer, never
    /// here.
    pub fn local_target(&self, entry: &CatalogEntry) -> PathBuf {
        self.data_dir().join(&entry.id).join(&entry.name)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: self.retry_delay,
        }
    }
}

/// Merge defaults, file values, and caller overrides into a [`RunConfig`].
///
/// # Errors
///
/// Fails when no layer supplies a bucket or an output root.
pub fn resolve_run_config(file: &ConfigFile, overrides: RunOverrides) -> Result<RunConfig> {
    let bucket = overrides
        .bucket
        .or_else(|| file.store.bucket.clone())
        .ok_or_else(|| Error::config("bucket is required (--bucket or [store].bucket)"))?;

    let output_root = overrides
        .output_root
        .ok_or_else(|| Error::config("output root is required"))?;

    let token = overrides.token.or_else(|| {
        file.store
            .token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
    });

    let extensions = overrides
        .extensions
        .or_else(|| file.run.extensions.clone())
        .map(|spec| ExtensionFilter::parse(&spec))
        .unwrap_or_default();

    let retry_delay_secs = overrides
        .retry_delay_secs
        .or(file.run.retry_delay_secs)
        .unwrap_or(DEFAULT_RETRY_DELAY_SECS);

    Ok(RunConfig {
        endpoint: overrides
            .endpoint
            .or_else(|| file.store.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        bucket,
        token,
        output_root,
        data_subdir: file
            .paths
            .data_subdir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_SUBDIR.to_string()),
        log_subdir: file
            .paths
            .log_subdir
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_SUBDIR.to_string()),
        log_file: overrides
            .log_file
            .or_else(|| file.paths.log_file.clone())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        extensions,
        skip_verified: overrides
            .skip_verified
            .or(file.run.skip_verified)
            .unwrap_or(false),
        algorithm: overrides
            .algorithm
            .or(file.run.algorithm)
            .unwrap_or_default(),
        max_retries: overrides
            .max_retries
            .or(file.run.retries)
            .unwrap_or(DEFAULT_MAX_RETRIES),
        retry_delay: Duration::from_secs(retry_delay_secs),
        concurrency: overrides
            .concurrency
            .or(file.run.concurrency)
            .unwrap_or(1)
            .max(1),
    })
}
