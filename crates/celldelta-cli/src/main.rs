//! celldelta CLI
//!
//! Command-line interface for cell-tower snapshot ingestion and diffing

use std::path::PathBuf;

use celldelta_core::errors::{CellDeltaError, ExError};
use celldelta_core::logging_facility;
use clap::{Args, Parser, Subcommand};

mod commands;
mod config;

use config::{CliConfig, StoreLocation};

#[derive(Debug, Parser)]
#[command(name = "celldelta")]
#[command(about = "celldelta - cell tower snapshots and differential change sets", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML config file (default: ./celldelta.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite ledger path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Snapshot blob directory
    #[arg(long, global = true)]
    pub cas: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest an OpenCellID CSV export and diff it against the latest snapshot
    Ingest(commands::ingest::IngestArgs),
    /// Diff two stored snapshots
    Diff(commands::diff::DiffArgs),
    /// List the run ledger
    List(commands::list::ListArgs),
    /// Show one stored snapshot
    Show(commands::show::ShowArgs),
}

/// Everything a subcommand needs besides its own arguments
pub struct Env {
    pub config: CliConfig,
    pub store: StoreLocation,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::load(cli.global.config.as_deref())?;
    logging_facility::init(config.profile()?);
    let store = StoreLocation::resolve(&config, cli.global.db, cli.global.cas);
    let env = Env { config, store };

    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &env),
        Commands::Diff(args) => commands::diff::execute(args, &env),
        Commands::List(args) => commands::list::execute(args, &env),
        Commands::Show(args) => commands::show::execute(args, &env),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if let Some(err) = e.downcast_ref::<ExError>() {
            eprintln!("{}", err);
        } else if let Some(err) = e.downcast_ref::<CellDeltaError>() {
            eprintln!("{}", ExError::from(err.clone()));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
