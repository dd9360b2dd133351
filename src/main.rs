//! Hotel Booking Statistics CLI
//!
//! Reads a command batch from stdin and writes query results to stdout.
//!
//! Usage:
//!   hotel-stats < commands.txt
//!   hotel-stats --window-span 3600 --map-kind ordered < commands.txt
//!
//! Environment:
//!   HOTEL_STATS_CONFIG - TOML config file (default: hotel_stats.toml if present)
//!   HOTEL_STATS_WINDOW_SPAN - Window span override
//!   HOTEL_STATS_MAP_KIND - Hotel index map (hashed | ordered)
//!   RUST_LOG - Log filter (default: hotel_stats=warn), logs go to stderr

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hotel_stats::{CommandInterpreter, MapKind, StatsConfig};

#[derive(Parser, Debug)]
#[command(name = "hotel-stats")]
#[command(about = "Sliding-window hotel booking statistics")]
struct Args {
    /// TOML config file
    #[arg(long, env = "HOTEL_STATS_CONFIG")]
    config: Option<PathBuf>,

    /// Statistics window span in time ticks
    #[arg(long, env = "HOTEL_STATS_WINDOW_SPAN")]
    window_span: Option<i64>,

    /// Hotel index map: hashed or ordered
    #[arg(long, env = "HOTEL_STATS_MAP_KIND")]
    map_kind: Option<MapKind>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "hotel_stats=warn".into()),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(args: &Args) -> Result<StatsConfig> {
    let mut config = match &args.config {
        Some(path) => StatsConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => StatsConfig::from_env()?,
    };
    if let Some(span) = args.window_span {
        config.window_span = span;
    }
    if let Some(kind) = args.map_kind {
        config.map_kind = kind;
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    let mut registry = config.build_registry().context("Invalid configuration")?;
    info!(
        window_span = config.window_span,
        map_kind = %config.map_kind,
        "processing commands"
    );

    let summary = {
        let output = BufWriter::new(io::stdout().lock());
        let mut interpreter = CommandInterpreter::new(io::stdin().lock(), output, &mut registry);
        interpreter.run()?
    };

    info!(
        commands = summary.commands,
        hotels = registry.entity_count(),
        "done"
    );
    Ok(())
}
