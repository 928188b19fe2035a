//! ECDB Ingest - enzyme store builder

use anyhow::Result;
use clap::{Parser, Subcommand};
use ecdb_common::logging::{init_logging, LogConfig, LogLevel};
use ecdb_ingest::{commands, IngestConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ecdb-ingest")]
#[command(author, version, about = "Build a SQLite enzyme store from a JSON release and text dump")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the store from scratch
    Run {
        /// JSON release (may be .gz)
        #[arg(short, long, env = "ECDB_SOURCE", default_value = "data/raw/brenda.json")]
        source: PathBuf,

        /// Store to rebuild
        #[arg(short, long, env = "ECDB_TARGET", default_value = "data/processed/brenda.db")]
        target: PathBuf,

        /// Flat-file dump (may be .gz); omit to skip the text pass
        #[arg(long, env = "ECDB_TEXT")]
        text: Option<PathBuf>,

        /// Rows per write transaction
        #[arg(long, env = "ECDB_BATCH_SIZE", default_value_t = ecdb_ingest::storage::DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Stop after this many JSON entries
        #[arg(long, env = "ECDB_LIMIT")]
        limit: Option<usize>,
    },

    /// Summarize an existing store
    Inspect {
        /// Store to read
        #[arg(short, long, env = "ECDB_TARGET", default_value = "data/processed/brenda.db")]
        target: PathBuf,

        /// Rows per ranking
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("ecdb-ingest")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);
    let _guard = init_logging(&log_config)?;

    match cli.command {
        Command::Run {
            source,
            target,
            text,
            batch_size,
            limit,
        } => {
            let mut config = IngestConfig::new(source, target).with_batch_size(batch_size);
            if let Some(text) = text {
                config = config.with_text(text);
            }
            if let Some(limit) = limit {
                config = config.with_limit(limit);
            }
            commands::run::run(&config)?;
        },
        Command::Inspect { target, top } => {
            info!(target = %target.display(), "Inspecting store");
            commands::inspect::run(&target, top)?;
        },
    }

    Ok(())
}
