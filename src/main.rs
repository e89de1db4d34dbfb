/// Main entry point for the Habit Heatmap MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use habit_heatmap_mcp::analytics::DEFAULT_MIN_GRID_DAYS;
use habit_heatmap_mcp::{HabitTrackerServer, HeatmapConfig};

/// Get the default database path, falling back through writable locations
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        dirs::home_dir().map(|mut p| {
            p.push(".habit_heatmap");
            p
        }),
        dirs::data_dir().map(|mut p| {
            p.push("habit_heatmap");
            p
        }),
        dirs::config_dir().map(|mut p| {
            p.push("habit_heatmap");
            p
        }),
        std::env::current_dir().ok().map(|mut p| {
            p.push(".habit_heatmap");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("habits.db"));
            }
        }
    }

    let mut temp_path = std::env::temp_dir();
    temp_path.push("habit_heatmap");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("habits.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

fn parse_tracking_start(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

/// Command line arguments for the Habit Heatmap MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "HABIT_HEATMAP_DB")]
    database: Option<PathBuf>,

    /// First day of the heatmap (YYYY-MM-DD); defaults to January 1 of this year
    #[arg(long, env = "HABIT_HEATMAP_START", value_parser = parse_tracking_start)]
    tracking_start: Option<NaiveDate>,

    /// Minimum number of cells in the heatmap grid
    #[arg(long, default_value_t = DEFAULT_MIN_GRID_DAYS)]
    min_grid_days: usize,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
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

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_heatmap_mcp={}", log_level))
        .with_writer(std::io::stderr) // stdout carries JSON-RPC
        .init();

    info!("Starting Habit Heatmap MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let config = HeatmapConfig {
        tracking_start: args.tracking_start,
        min_grid_days: args.min_grid_days,
    };

    let server = HabitTrackerServer::new(db_path, config).await?;
    server.run().await?;

    info!("Habit Heatmap MCP server shutdown complete");
    Ok(())
}
