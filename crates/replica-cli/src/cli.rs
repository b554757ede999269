//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use replica_fs::ChecksumAlgorithm;

/// Replica Manager - Reconcile a declared catalog into a verified local replica
#[derive(Parser, Debug)]
#[command(name = "replica")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration file (default: ./replica.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Reconcile a catalog manifest into the local replica
    ///
    /// Loads the manifest, probes each admitted entry, transfers what is
    /// missing or stale, verifies checksums, and appends one outcome record
    /// per entry to the run log.
    ///
    /// Examples:
    ///   replica run -m manifest.tsv -o ./mirror --bucket open-data
    ///   replica run -m manifest.tsv -o ./mirror -e bam,svs --skip-verified
    ///   replica run -m retry.tsv -o ./mirror --retries 3 --retry-delay 5
    Run(RunArgs),

    /// Probe every catalog entry without transferring anything
    ///
    /// A fast existence sweep: useful before committing to a long transfer
    /// run, and for auditing a catalog against a live store.
    Check(CheckArgs),

    /// Derive a retry manifest from a prior run's outcome log
    ///
    /// Selects the log's failure subset and writes it back out in catalog
    /// schema, ready to feed into `replica run`.
    Retry {
        /// Outcome log to read
        #[arg(short, long)]
        log_file: PathBuf,

        /// Where to write the retry manifest
        #[arg(short, long)]
        output: PathBuf,

        /// Comma-separated status names overriding the default failure set
        #[arg(long)]
        statuses: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Arguments for the `run` command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Catalog manifest path (tab-separated, header row mandatory)
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Base output directory; data and logs live in subdirectories of it
    #[arg(short, long)]
    pub output: PathBuf,

    /// Bucket holding the catalog's objects
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Object-store endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Bearer token for access-controlled buckets
    #[arg(long, env = "REPLICA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Comma-separated extension allow list (e.g. 'bam,svs')
    #[arg(short, long)]
    pub extensions: Option<String>,

    /// Skip entries whose local file already matches its checksum
    #[arg(long)]
    pub skip_verified: bool,

    /// Maximum retries after a failed transfer attempt
    #[arg(long)]
    pub retries: Option<u32>,

    /// Fixed delay between transfer attempts, in seconds
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// Entries processed concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Checksum algorithm (md5 or sha256)
    #[arg(long)]
    pub algorithm: Option<ChecksumAlgorithm>,

    /// Outcome log file name (under the logs subdirectory)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Print the summary as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Catalog manifest path (tab-separated, header row mandatory)
    #[arg(short, long)]
    pub manifest: PathBuf,

    /// Bucket holding the catalog's objects
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Object-store endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Bearer token for access-controlled buckets
    #[arg(long, env = "REPLICA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Comma-separated extension allow list
    #[arg(short, long)]
    pub extensions: Option<String>,

    /// Where to write the failures-only log (omit to skip)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print the sweep result as JSON for scripting
    #[arg(long)]
    pub json: bool,
}
