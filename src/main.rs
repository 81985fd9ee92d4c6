//! Courtline - play-by-play basketball statistics backend
//!
//! Ingests team, player, and game feeds into a relational store, then
//! serves per-player action-type summaries over HTTP. Loading runs to
//! completion before the server starts.

use anyhow::Result;
use courtline::cli::{self, Cli, Commands};
use courtline::config::AppConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse_args();

    // Setup logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = AppConfig::load_or_default(&args.config)?;

    // Execute command
    match args.command {
        Commands::Serve(serve_args) => {
            cli::serve(&config, &serve_args).await?;
        }

        Commands::Load(load_args) => {
            cli::load(&config, &load_args)?;
        }

        Commands::Stats => {
            cli::stats(&config)?;
        }
    }

    Ok(())
}
