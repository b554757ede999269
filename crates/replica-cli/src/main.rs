//! Replica Manager CLI
//!
//! The command-line interface for reconciling declared object catalogs into a
//! checksum-verified local replica.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(command) => execute_command(command, cli.config.as_deref()).await,
        None => {
            // No command provided - show help hint
            println!("{} Replica Manager CLI", "replica".green().bold());
            println!();
            println!("Run {} for available commands.", "replica --help".cyan());
            Ok(0)
        }
    }
}

async fn execute_command(command: Commands, config: Option<&std::path::Path>) -> Result<i32> {
    match command {
        Commands::Run(args) => commands::run_reconcile(args, config).await,
        Commands::Check(args) => commands::run_check(args, config).await,
        Commands::Retry {
            log_file,
            output,
            statuses,
        } => commands::run_retry(&log_file, &output, statuses.as_deref()),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "replica",
                &mut std::io::stdout(),
            );
            Ok(0)
        }
    }
}
