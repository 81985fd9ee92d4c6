//! Loader for the three source collections
//!
//! Normalizes the loosely-typed team, player, and game feeds into the
//! relational schema in three passes:
//! - team pass: insert-or-ignore on `team_id`
//! - player pass: insert-or-ignore on `player_id`, then append every
//!   nested shot/pass/turnover event unconditionally
//! - game pass: insert-or-ignore on the feed's `id`
//!
//! Each pass commits on its own; a failure in a later pass leaves the
//! earlier passes applied.

mod records;

pub use records::{
    GameRecord, PassRecord, PlayerRecord, ShotRecord, TeamRecord, TurnoverRecord,
};

use crate::storage::Database;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use tracing::debug;

/// Rows written by a full load, by table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub teams: usize,
    pub players: usize,
    pub shots: usize,
    pub passes: usize,
    pub turnovers: usize,
    pub games: usize,
}

/// Parse one source collection from a JSON reader
pub fn read_records<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    serde_json::from_reader(reader).context("Failed to parse source records")
}

/// Run the three load passes against the given database
///
/// Reference rows dedupe on their natural keys, so the report counts only
/// rows actually inserted. Event rows are appended unconditionally.
pub fn load(
    db: &mut Database,
    teams: &[TeamRecord],
    players: &[PlayerRecord],
    games: &[GameRecord],
) -> Result<LoadReport> {
    let teams_inserted = db.load_teams(teams)?;
    debug!(inserted = teams_inserted, "team pass committed");

    let player_counts = db.load_players(players)?;
    debug!(
        players = player_counts.players,
        shots = player_counts.shots,
        passes = player_counts.passes,
        turnovers = player_counts.turnovers,
        "player pass committed"
    );

    let games_inserted = db.load_games(games)?;
    debug!(inserted = games_inserted, "game pass committed");

    Ok(LoadReport {
        teams: teams_inserted,
        players: player_counts.players,
        shots: player_counts.shots,
        passes: player_counts.passes,
        turnovers: player_counts.turnovers,
        games: games_inserted,
    })
}
