//! Neighbors CLI
//!
//! Main entry point for the neighbors command-line tool.
//! Prints the documents nearest to a given document in a prebuilt vector index.

mod commands;

use clap::Parser;
use commands::LookupCommand;
use neighbors_core::{
    config::{AppConfig, Overrides},
    logging, AppResult,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Neighbors CLI - nearest documents from a prebuilt vector index
#[derive(Parser, Debug)]
#[command(name = "neighbors")]
#[command(about = "Print the nearest documents to a document in a prebuilt vector index", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the data files (default: current directory)
    #[arg(short, long, env = "NEIGHBORS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to config file (default: <data-dir>/neighbors.yaml if present)
    #[arg(short, long, env = "NEIGHBORS_CONFIG")]
    config: Option<PathBuf>,

    /// Id table, one document label per line
    #[arg(long, env = "NEIGHBORS_ID_TABLE")]
    id_table: Option<PathBuf>,

    /// Serialized flat vector index
    #[arg(long, env = "NEIGHBORS_INDEX")]
    index: Option<PathBuf>,

    /// Number of neighbors to print
    #[arg(short = 'k', long, env = "NEIGHBORS_TOP_K")]
    top_k: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    #[command(flatten)]
    lookup: LookupCommand,
}

fn main() -> ExitCode {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Lookup failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.data_dir, cli.config)?.with_overrides(Overrides {
        id_table: cli.id_table,
        index: cli.index,
        top_k: cli.top_k,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });
    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Neighbors CLI starting");
    tracing::debug!("Data dir: {:?}", config.data_dir);
    tracing::debug!("Id table: {:?}", config.id_table_path());
    tracing::debug!("Index: {:?}", config.index_path());

    let _span = tracing::info_span!("command", name = "lookup").entered();
    cli.lookup.execute(&config)?;

    tracing::debug!("Command completed successfully");
    Ok(())
}
