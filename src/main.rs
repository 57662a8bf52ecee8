/// Main entry point for the Life Tracker MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use life_tracker_mcp::domain::WeekStart;
use life_tracker_mcp::{Config, LifeTrackerServer};

/// Command line arguments for the Life Tracker MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    /// Trailing window for the analytics snapshot, in days
    #[arg(long, default_value_t = 30)]
    window_days: u32,

    /// First day of the week in calendar views (sunday or monday)
    #[arg(long, default_value = "sunday", value_parser = parse_week_start)]
    week_start: WeekStart,
}

fn parse_week_start(raw: &str) -> Result<WeekStart, String> {
    raw.parse().map_err(|e: life_tracker_mcp::DomainError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("life_tracker_mcp={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout carries the protocol
        .init();

    info!("Starting Life Tracker MCP server");

    let db_path = Config::resolve_database_path(args.database)?;
    let config = Config::new(db_path).with_window_days(args.window_days)?.with_week_start(args.week_start);
    info!("Using database at: {}", config.database_path.display());

    let server = LifeTrackerServer::new(config)?;
    server.run().await?;

    info!("Life Tracker MCP server shutdown complete");
    Ok(())
}
