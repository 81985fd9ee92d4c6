//! Command implementations

use crate::cli::{LoadArgs, ServeArgs};
use crate::config::AppConfig;
use crate::ingest::{self, GameRecord, LoadReport, PlayerRecord, TeamRecord};
use crate::server::{self, AppState};
use crate::storage::Database;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Rebuild the schema and load the three source collections
pub fn load(config: &AppConfig, args: &LoadArgs) -> Result<()> {
    let mut db = Database::open(&config.database)?;
    let report = rebuild(&mut db, config, args)?;
    print_report(&report);
    Ok(())
}

/// Load (unless skipped) and then serve the API
pub async fn serve(config: &AppConfig, args: &ServeArgs) -> Result<()> {
    let mut db = Database::open(&config.database)?;

    if args.skip_load {
        // Serving an existing database; fail early if it was never loaded.
        db.stats()
            .context("Database has no schema. Run 'courtline load' first.")?;
    } else {
        let report = rebuild(&mut db, config, &LoadArgs::default())?;
        print_report(&report);
    }

    let mut server_config = config.server.clone();
    if let Some(ref host) = args.host {
        server_config.host = host.clone();
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }
    let addr = server_config.addr()?;

    println!("Serving courtline API at http://{}", addr);
    println!("  Player summary: http://{}/api/v1/playerSummary/0", addr);

    let state = Arc::new(AppState::new(db));
    server::serve(state, addr, server_config.cors_origin.as_deref()).await
}

/// Show row counts for the loaded tables
pub fn stats(config: &AppConfig) -> Result<()> {
    if !config.database.exists() {
        anyhow::bail!("Database not found. Run 'courtline load' first.");
    }

    let db = Database::open(&config.database)?;
    let stats = db.stats()?;

    println!("Teams:     {}", stats.teams);
    println!("Players:   {}", stats.players);
    println!("Games:     {}", stats.games);
    println!("Shots:     {}", stats.shots);
    println!("Passes:    {}", stats.passes);
    println!("Turnovers: {}", stats.turnovers);

    Ok(())
}

/// Reset the schema and run the three load passes in order
fn rebuild(db: &mut Database, config: &AppConfig, args: &LoadArgs) -> Result<LoadReport> {
    let teams_path = args.teams.as_deref().unwrap_or(&config.sources.teams);
    let players_path = args.players.as_deref().unwrap_or(&config.sources.players);
    let games_path = args.games.as_deref().unwrap_or(&config.sources.games);

    db.reset_schema()?;
    info!("schema rebuilt");

    let teams: Vec<TeamRecord> = read_collection(teams_path)?;
    let players: Vec<PlayerRecord> = read_collection(players_path)?;
    let games: Vec<GameRecord> = read_collection(games_path)?;

    ingest::load(db, &teams, &players, &games)
}

fn read_collection<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open source file: {:?}", path))?;
    ingest::read_records(file).with_context(|| format!("Failed to load records from {:?}", path))
}

fn print_report(report: &LoadReport) {
    println!(
        "✓ Loaded {} teams, {} players, {} games",
        report.teams, report.players, report.games
    );
    println!(
        "  Events: {} shots, {} passes, {} turnovers",
        report.shots, report.passes, report.turnovers
    );
}
