//! CLI interface using clap
//!
//! Provides the command-line interface for courtline

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Courtline - play-by-play basketball statistics backend
#[derive(Parser, Debug)]
#[command(name = "courtline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "courtline.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the schema, load the source collections, and serve the API
    Serve(ServeArgs),

    /// Rebuild the schema and load the source collections
    Load(LoadArgs),

    /// Show row counts for the loaded tables
    Stats,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Listen host (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,

    /// Serve the existing database without rebuilding and reloading it
    #[arg(long)]
    pub skip_load: bool,
}

/// Arguments for the load command
#[derive(Parser, Debug, Default)]
pub struct LoadArgs {
    /// Teams collection (overrides the config file)
    #[arg(long)]
    pub teams: Option<PathBuf>,

    /// Players collection (overrides the config file)
    #[arg(long)]
    pub players: Option<PathBuf>,

    /// Games collection (overrides the config file)
    #[arg(long)]
    pub games: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
