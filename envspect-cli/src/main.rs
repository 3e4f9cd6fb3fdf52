// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! envspect CLI - CircleCI account configuration inventory.
//!
//! # Examples
//!
//! ```bash
//! # Collect everything for a GitHub org (tokens from the environment)
//! envspect --account acme
//!
//! # Same, spelled out
//! envspect collect --vcs github --account acme --account-type org
//!
//! # Bitbucket account, repositories taken from the followed-project list
//! envspect collect --vcs bitbucket --account acme
//!
//! # Only two repositories, four jobs at a time
//! envspect collect --account acme --repo acme/widgets --repo acme/gadgets --concurrency 4
//!
//! # Print the report to stdout as well
//! envspect collect --account acme --format json --pretty
//!
//! # Which accounts can this token act for?
//! envspect orgs
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{collect, orgs};

// ============================================================================
// CLI Definition
// ============================================================================

/// envspect CLI - CircleCI account configuration inventory.
#[derive(Parser)]
#[command(name = "envspect")]
#[command(about = "Inventory CircleCI contexts, project variables and SSH keys")]
#[command(long_about = r"
envspect walks a CircleCI account and writes one JSON report of every
context (with its variables), every project's environment variables and
SSH keys, and the repositories whose configuration could not be read.

Repositories are discovered through GitHub (org or user listing) or
through the CircleCI followed-project list for Bitbucket accounts.

Tokens come from flags or the environment:
  CIRCLE_TOKEN   CircleCI personal API token
  GITHUB_TOKEN   GitHub personal access token (GitHub accounts only)

Examples:
  envspect --account acme                 # Collect for a GitHub org
  envspect collect --vcs bitbucket --account acme
  envspect collect --account acme --concurrency 4
  envspect orgs                           # List accounts for the token
")]
#[command(version)]
#[command(author = "envspect contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'collect' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Collect the account inventory (default if no command specified).
    #[command(visible_alias = "c")]
    Collect(collect::CollectArgs),

    /// List the accounts the token can act for.
    #[command(visible_alias = "o")]
    Orgs(orgs::OrgsArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Full report as JSON on stdout.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("envspect=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envspect=warn"))
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
        Some(Commands::Collect(args)) => collect::run(args, &cli).await,
        Some(Commands::Orgs(args)) => orgs::run(args, &cli).await,
        None => {
            // Bare invocation: collect, configured from the environment
            collect::run(&collect::CollectArgs::from_env(), &cli).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
