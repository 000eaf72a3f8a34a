//! Terminal procedures command-line entry point
//!
//! Lists FAA terminal procedure charts for airports and shows publication
//! cycle information.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use terminal_procedures::config::{load_config, Config};
use terminal_procedures::{CycleKind, Icaos, ListOptions, ProceduresClient};
use tracing_subscriber::EnvFilter;

/// Look up FAA d-TPP terminal procedures
#[derive(Parser, Debug)]
#[command(name = "terminal-procedures")]
#[command(version)]
#[command(about = "FAA terminal procedure listings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List procedures for one or more airports as JSON
    List {
        /// Airport identifiers, e.g. PANC KSEA
        #[arg(value_name = "ICAO", required = true)]
        icaos: Vec<String>,

        /// Only procedures Added (A), Changed (C) or Deleted (D) this cycle; repeatable
        #[arg(short, long = "flag", value_name = "FLAG")]
        flags: Vec<String>,
    },

    /// Show the current or next cycle
    Cycle {
        #[arg(default_value = "current")]
        which: CycleKind,
    },

    /// Show the effective dates of the current or next cycle
    Dates {
        #[arg(default_value = "current")]
        which: CycleKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    let client = ProceduresClient::new(&config)?;

    match cli.command {
        Command::List { icaos, flags } => handle_list(&client, &config, icaos, flags).await,
        Command::Cycle { which } => handle_cycle(&client, which).await,
        Command::Dates { which } => handle_dates(&client, which).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("terminal_procedures=warn,warn"),
            1 => EnvFilter::new("terminal_procedures=info,warn"),
            2 => EnvFilter::new("terminal_procedures=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handles `list`: command-line flags take precedence over configured ones
async fn handle_list(
    client: &ProceduresClient,
    config: &Config,
    icaos: Vec<String>,
    flags: Vec<String>,
) -> anyhow::Result<()> {
    let options = if flags.is_empty() {
        ListOptions::from_flags(&config.query.flags)
    } else {
        ListOptions::from_flags(&flags)
    };

    let icaos = if icaos.len() == 1 {
        Icaos::One(icaos.into_iter().next().unwrap_or_default())
    } else {
        Icaos::Many(icaos)
    };

    let listing = client.list(icaos, &options).await?;
    println!("{}", serde_json::to_string_pretty(&listing)?);

    Ok(())
}

async fn handle_cycle(client: &ProceduresClient, which: CycleKind) -> anyhow::Result<()> {
    match client.resolve_cycle(which).await? {
        Some(cycle) => println!("{} (code {})", cycle.label, cycle.code),
        None => println!("{} cycle is not published", which),
    }
    Ok(())
}

async fn handle_dates(client: &ProceduresClient, which: CycleKind) -> anyhow::Result<()> {
    match client.effective_dates_for(which).await? {
        Some(range) => println!(
            "{} cycle effective {} to {}",
            which,
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d")
        ),
        None => println!("No effective dates available for the {} cycle", which),
    }
    Ok(())
}
