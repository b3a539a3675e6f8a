//! RuteKita CLI - delivery route search
//!
//! Picks an origin (the depot by default) and a destination, asks the
//! routing service for the shortest path and shows distance, estimated time
//! and the route the map would draw.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use rutekita_geo::GeoPoint;
use rutekita_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{config, interactive, route};

/// Delivery route search
#[derive(Parser)]
#[command(name = "rutekita")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    /// Configuration file (defaults to rutekita.toml or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one route
    Route {
        /// Origin as LAT,LON (defaults to the depot)
        #[arg(long, allow_hyphen_values = true)]
        from: Option<GeoPoint>,

        /// Destination as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        to: Option<GeoPoint>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pick points and compute routes from a prompt
    Interactive,

    /// Show the effective configuration
    Config {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = rutekita_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let as_json = |flag: bool| flag || cli.format == "json";
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Route { from, to, json } => {
            route::run(config_path, from, to, as_json(json), cli.verbose).await
        }
        Commands::Interactive => interactive::run(config_path).await,
        Commands::Config { json } => config::run(config_path, as_json(json)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
