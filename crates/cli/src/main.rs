//! # PR Metrics CLI
//!
//! Command-line interface for sizing pull requests and publishing their
//! metrics.
//!
//! This binary computes the size of a pull request from its
//! `git diff --numstat` summary and updates the pull request on GitHub or
//! Azure Repos with a metrics comment, a size indicator in the title and
//! "no review required" comments on excluded files.
//!
//! # Commands
//!
//! - `run` - Compute the metrics and update the pull request
//! - `analyze` - Compute the metrics and print them without contacting a provider
//!
//! # Examples
//!
//! ```bash
//! # Update a GitHub pull request
//! PR_METRICS_TOKEN=<token> pr-metrics run --provider github --repository owner/repo --pr-number 123
//!
//! # Inspect a diff locally
//! pr-metrics analyze --base origin/main --head HEAD
//! ```

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

use std::process::{ExitCode, Termination};

use clap::{Parser, Subcommand};
use tracing::{error, info, instrument};

/// Command implementations for the CLI.
mod commands;

/// Configuration loading for the CLI.
mod config;

/// Reading the diff summary of a pull request.
mod diff_source;

/// Error types specific to the CLI.
mod errors;

use commands::{analyze::AnalyzeArgs, run::RunArgs};
use errors::CliError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line interface structure for PR Metrics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for the PR Metrics CLI.
#[derive(Subcommand)]
enum Commands {
    /// Compute the metrics of a pull request and update it
    Run(RunArgs),

    /// Compute the metrics of a diff and print them
    Analyze(AnalyzeArgs),
}

/// Main entry point for the PR Metrics CLI.
///
/// Initializes logging from the `PR_METRICS_LOG` environment variable,
/// parses the command line and dispatches to the command handler. Errors
/// are mapped to the exit code of their [`CliError`] variant.
#[tokio::main]
#[instrument]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("PR_METRICS_LOG"))
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Set verbose logging if requested
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let result: Result<(), CliError> = match cli.command {
        Commands::Run(args) => commands::run::execute(args).await.inspect_err(|e| {
            error!("Error updating the pull request: {}", e);
        }),
        Commands::Analyze(args) => commands::analyze::execute(args).await.inspect_err(|e| {
            error!("Error analyzing the diff: {}", e);
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            e.report()
        }
    }
}
