// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `GamerPower` CLI - free game giveaways from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Fetch once and show the summary views
//! gamerpower
//!
//! # List active giveaways grouped by platform
//! gamerpower list --by-platform
//!
//! # JSON output
//! gamerpower --format json --pretty refresh
//!
//! # Look up giveaways by id
//! gamerpower get 525 1931
//!
//! # Keep polling, press r + Enter to refresh early
//! gamerpower watch
//!
//! # Only Steam and Epic full games, every 15 minutes
//! gamerpower config platforms steam epic-games-store
//! gamerpower config types game
//! gamerpower config interval 15
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gamerpower_store::StoreError;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{CliError, check, config, get, list, refresh, summary, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// `GamerPower` CLI - free game giveaway tracker.
#[derive(Parser)]
#[command(name = "gamerpower")]
#[command(about = "Free game giveaway tracker for the GamerPower API")]
#[command(long_about = r#"
GamerPower polls gamerpower.com for free games, loot and beta keys.

Views:
  • Total Giveaways         number of live giveaways, by type
  • Total Worth             estimated worth in USD
  • Latest Giveaway         most recently listed giveaway
  • Active Giveaways List   up to 50 giveaways, grouped by platform

Examples:
  gamerpower                       # Summary of the current giveaways
  gamerpower list --by-platform    # Titles grouped by platform
  gamerpower get 525               # One giveaway by id
  gamerpower watch                 # Keep polling
  gamerpower config keys           # Available platform and type filters
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'summary' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Settings file to use instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch once and show the views (default if no command specified).
    #[command(visible_alias = "s")]
    Summary,

    /// Fetch once and list active giveaways.
    #[command(visible_alias = "l")]
    List(list::ListArgs),

    /// Run one refresh cycle and print every view with its attributes.
    #[command(visible_alias = "r")]
    Refresh,

    /// Look up giveaways by id.
    #[command(visible_alias = "g")]
    Get(get::GetArgs),

    /// Keep polling on the configured interval.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Check that the GamerPower API is reachable.
    Check,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// A requested giveaway does not exist.
    NotFound = 2,
    /// The API could not be reached.
    CannotConnect = 3,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::NotFound(_) => ExitCode::NotFound,
                CliError::CannotConnect(_) => ExitCode::CannotConnect,
            };
        }
        if let Some(store_err) = err.downcast_ref::<StoreError>() {
            if matches!(store_err, StoreError::NotReady(_)) || store_err.is_connectivity() {
                return ExitCode::CannotConnect;
            }
        }
        if let Some(fetch_err) = err.downcast_ref::<gamerpower_fetch::FetchError>() {
            if fetch_err.is_connectivity() {
                return ExitCode::CannotConnect;
            }
        }
        ExitCode::Error
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("gamerpower=debug,info")
    } else {
        EnvFilter::new("gamerpower=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Summary) | None => summary::run(&cli).await,
        Some(Commands::List(args)) => list::run(args, &cli).await,
        Some(Commands::Refresh) => refresh::run(&cli).await,
        Some(Commands::Get(args)) => get::run(args, &cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        Some(Commands::Check) => check::run(&cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
