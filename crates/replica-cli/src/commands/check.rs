//! The `check` command: probe-only existence sweep

use std::path::Path;

use colored::Colorize;

use replica_core::check_sweep;
use replica_manifest::{ExtensionFilter, read_manifest};
use replica_store::{HttpStore, HttpStoreConfig};

use crate::cli::CheckArgs;
use crate::error::{CliError, Result};

pub async fn run_check(args: CheckArgs, config_path: Option<&Path>) -> Result<i32> {
    let file = super::load_config_file(config_path)?;

    let bucket = args
        .bucket
        .or_else(|| file.store.bucket.clone())
        .ok_or_else(|| CliError::user("bucket is required (--bucket or [store].bucket)"))?;
    let endpoint = args
        .endpoint
        .or_else(|| file.store.endpoint.clone())
        .unwrap_or_else(|| replica_core::config::DEFAULT_ENDPOINT.to_string());
    let token = args.token.or_else(|| {
        file.store
            .token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
    });

    let entries = read_manifest(&args.manifest)?;
    let filter = args
        .extensions
        .or_else(|| file.run.extensions.clone())
        .map(|spec| ExtensionFilter::parse(&spec))
        .unwrap_or_default();
    let (admitted, excluded) = filter.partition(entries);

    if admitted.is_empty() {
        println!(
            "{} No entries to check after filtering ({} excluded).",
            "=>".blue().bold(),
            excluded.len()
        );
        return Ok(0);
    }

    println!(
        "{} Probing {} entries against {}/{}",
        "=>".blue().bold(),
        admitted.len(),
        endpoint.cyan(),
        bucket.cyan()
    );

    let store = HttpStore::new(HttpStoreConfig {
        endpoint,
        token,
        connect_timeout: None,
    })?;

    let summary = check_sweep(&store, &bucket, &admitted, args.log_file.as_deref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        println!(
            " Probed {} entries: {} present, {} unavailable.",
            summary.probed,
            summary.found.to_string().green(),
            summary.problems.len().to_string().yellow()
        );
        for problem in &summary.problems {
            println!("  - {} ({}): {}", problem.name.cyan(), problem.id.dimmed(), problem.message);
        }
        if let Some(log) = &args.log_file {
            println!(" Failures log: {}", log.display().to_string().cyan());
        }
    }

    Ok(if summary.problems.is_empty() { 0 } else { 2 })
}
