//! The `retry` command: derive a retry manifest from an outcome log

use std::path::Path;

use colored::Colorize;

use replica_log::{OutcomeStatus, default_retry_statuses, read_log, retry_rows};
use replica_manifest::write_manifest;

use crate::error::{CliError, Result};

pub fn run_retry(log_file: &Path, output: &Path, statuses: Option<&str>) -> Result<i32> {
    let records = read_log(log_file)?;

    let statuses = match statuses {
        Some(spec) => parse_statuses(spec)?,
        None => default_retry_statuses(),
    };

    let rows = retry_rows(&records, &statuses);
    if rows.is_empty() {
        // A valid terminal outcome, not an error.
        println!(
            "{} No matching entries in the log. Nothing to retry.",
            "=>".blue().bold()
        );
        return Ok(0);
    }

    write_manifest(output, &rows)?;

    println!(
        "{} Wrote retry manifest with {} entries: {}",
        "OK".green().bold(),
        rows.len(),
        output.display().to_string().cyan()
    );
    println!();
    println!("Retry with:");
    println!(
        "  {}",
        format!(
            "replica run --manifest {} --output <output-dir>",
            output.display()
        )
        .cyan()
    );

    Ok(0)
}

fn parse_statuses(spec: &str) -> Result<Vec<OutcomeStatus>> {
    spec.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<OutcomeStatus>()
                .map_err(|err| CliError::user(err))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_status_names() {
        let statuses = parse_statuses("FAILED_TRANSFER, SKIPPED_REMOTE_NOT_FOUND").unwrap();
        assert_eq!(
            statuses,
            vec![
                OutcomeStatus::FailedTransfer,
                OutcomeStatus::SkippedRemoteNotFound
            ]
        );
    }

    #[test]
    fn rejects_unknown_status_names() {
        assert!(parse_statuses("FAILED_TRANSFER,BOGUS").is_err());
    }
}
