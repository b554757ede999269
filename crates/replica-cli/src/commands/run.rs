//! The `run` command: full reconciliation

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use colored::Colorize;
use tokio::sync::mpsc;

use replica_core::{
    ProgressEvent, ReconcileEngine, RunOverrides, RunSummary, resolve_run_config,
};
use replica_log::OutcomeStatus;
use replica_manifest::read_manifest;
use replica_store::{HttpStore, HttpStoreConfig};

use crate::cli::RunArgs;
use crate::error::Result;

pub async fn run_reconcile(args: RunArgs, config_path: Option<&Path>) -> Result<i32> {
    let file = super::load_config_file(config_path)?;

    let overrides = RunOverrides {
        endpoint: args.endpoint,
        bucket: args.bucket,
        token: args.token,
        output_root: Some(args.output),
        extensions: args.extensions,
        skip_verified: args.skip_verified.then_some(true),
        algorithm: args.algorithm,
        max_retries: args.retries,
        retry_delay_secs: args.retry_delay,
        concurrency: args.concurrency,
        log_file: args.log_file,
    };
    let config = resolve_run_config(&file, overrides)?;
    let log_path = config.log_path();

    let entries = read_manifest(&args.manifest)?;
    if entries.is_empty() {
        println!(
            "{} Manifest contains no valid entries. Nothing to do.",
            "=>".blue().bold()
        );
        return Ok(0);
    }

    println!(
        "{} Reconciling {} entries from {} into {}",
        "=>".blue().bold(),
        entries.len(),
        args.manifest.display().to_string().cyan(),
        config.data_dir().display().to_string().cyan()
    );

    let store = Arc::new(HttpStore::new(HttpStoreConfig {
        endpoint: config.endpoint.clone(),
        token: config.token.clone(),
        connect_timeout: None,
    })?);

    let (sender, receiver) = mpsc::unbounded_channel();
    let engine = ReconcileEngine::new(store, config).with_progress(sender);

    // Ctrl-C stops the run before the next entry is dispatched.
    let cancel = engine.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!(
                "\n{} Interrupt received; finishing in-flight entries...",
                "=>".yellow().bold()
            );
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let quiet = args.json;
    let printer = tokio::spawn(print_progress(receiver, quiet));

    let summary = engine.run(entries).await?;

    // Dropping the engine closes the progress channel and ends the printer.
    drop(engine);
    let _ = printer.await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &log_path);
    }

    Ok(if summary.is_clean() { 0 } else { 2 })
}

/// Render progress events as they arrive. Purely cosmetic — the engine does
/// not depend on this consumer existing or keeping up.
async fn print_progress(
    mut receiver: mpsc::UnboundedReceiver<ProgressEvent>,
    quiet: bool,
) {
    while let Some(event) = receiver.recv().await {
        if quiet {
            continue;
        }
        match event {
            ProgressEvent::EntryStarted {
                index,
                total,
                id,
                name,
            } => {
                println!(
                    ">>> [{index}/{total}] {} ({})",
                    name.cyan(),
                    id.dimmed()
                );
            }
            ProgressEvent::EntryFinished { status, name, .. } => {
                println!("    {} {}", status_label(status), name);
            }
            ProgressEvent::RunFinished { .. } => {}
        }
    }
}

fn status_label(status: OutcomeStatus) -> colored::ColoredString {
    let label = status.as_str();
    if status.is_satisfied() {
        label.green().bold()
    } else if status.is_failure() {
        label.red().bold()
    } else {
        label.yellow().bold()
    }
}

fn print_summary(summary: &RunSummary, log_path: &Path) {
    println!();
    println!("==================================================");
    println!("            Reconciliation summary");
    println!("==================================================");
    println!(" Declared in manifest:          {}", summary.total_declared);
    println!(" Excluded by extension filter:  {}", summary.filtered_out);
    println!(" Processed:                     {}", summary.processed());
    println!("--------------------------------------------------");
    for (status, count) in summary.nonzero_counts() {
        // Plain text here: ANSI escapes would break the column alignment.
        println!(" {:<30} {count}", status.as_str());
    }

    if !summary.problems.is_empty() {
        println!("--------------------------------------------------");
        println!(" Entries needing attention (status | uuid | filename | reason):");
        let mut problems = summary.problems.clone();
        problems.sort_by(|a, b| (a.status, &a.name).cmp(&(b.status, &b.name)));
        for problem in &problems {
            println!(
                "  - {:<28} | {:<36} | {:<40} | {}",
                problem.status.as_str(),
                problem.id,
                problem.name,
                problem.reason
            );
        }
    }

    println!("--------------------------------------------------");
    if summary.is_clean() {
        println!(
            " {} Every processed entry is verified locally.",
            "OK".green().bold()
        );
    } else {
        println!(
            " {} {} failure(s), {} existence skip(s). A retry manifest can be derived with {}.",
            "ATTENTION".yellow().bold(),
            summary.failure_total(),
            summary.problems.len() - summary.failure_total(),
            "replica retry".cyan()
        );
    }
    println!(" Full log: {}", log_path.display().to_string().cyan());
    println!("==================================================");
}
