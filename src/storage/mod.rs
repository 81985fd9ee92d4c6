//! SQLite storage layer for courtline
//!
//! This module holds the normalized relational schema:
//! - team / player / game reference tables keyed by their source natural keys
//! - shot / pass / turnover event tables, append-only
//!
//! Reference rows are written insert-or-ignore on the natural key, so
//! re-running a load pass never updates an existing team, player, or game.
//! Event rows carry no uniqueness constraint and duplicate on reload; a
//! fully idempotent reload therefore starts with [`Database::reset_schema`].

mod schema;

pub use schema::{DROP_TABLES, SCHEMA};

use crate::ingest::{GameRecord, PlayerRecord, TeamRecord};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path
    ///
    /// The schema is not created here; call [`Database::reset_schema`]
    /// before the first load pass.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open database at {:?}", path.as_ref()))?;
        conn.pragma_update(None, "foreign_keys", false)
            .context("Failed to disable foreign-key enforcement")?;

        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.pragma_update(None, "foreign_keys", false)
            .context("Failed to disable foreign-key enforcement")?;

        Ok(Self { conn })
    }

    // ==================== Schema ====================

    /// Drop all courtline tables and recreate them in dependency order
    ///
    /// Existing rows are lost. Safe to call on an empty store. A failure
    /// mid-sequence leaves the store inconsistent and is fatal; callers
    /// must not proceed to load data after an error.
    pub fn reset_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(DROP_TABLES)
            .context("Failed to drop existing tables")?;
        self.conn
            .execute_batch(SCHEMA)
            .context("Failed to create schema")?;
        Ok(())
    }

    // ==================== Load Passes ====================

    /// Insert-or-ignore every team record, keyed on `team_id`
    ///
    /// Returns the number of rows actually inserted; re-loading an already
    /// known team counts zero.
    pub fn load_teams(&mut self, teams: &[TeamRecord]) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin team pass")?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO team (team_id, name) VALUES (?1, ?2)",
            )?;
            for team in teams {
                inserted += stmt
                    .execute(params![team.team_id, team.name])
                    .context("Failed to insert team")?;
            }
        }

        tx.commit().context("Failed to commit team pass")?;
        Ok(inserted)
    }

    /// Insert-or-ignore every player record, then append its nested events
    ///
    /// Player identity rows dedupe on `player_id`; shot/pass/turnover rows
    /// are written unconditionally and duplicate if the same source is
    /// loaded twice without a schema reset.
    pub fn load_players(&mut self, players: &[PlayerRecord]) -> Result<PlayerPassCounts> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin player pass")?;

        let mut counts = PlayerPassCounts::default();
        {
            let mut insert_player = tx.prepare_cached(
                "INSERT OR IGNORE INTO player (player_id, first_name, last_name, full_name, team_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_shot = tx.prepare_cached(
                "INSERT INTO shot (player_id, action_type, loc_x, loc_y, points, game_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            let mut insert_pass = tx.prepare_cached(
                "INSERT INTO pass (player_id, action_type, start_loc_x, start_loc_y,
                                   end_loc_x, end_loc_y, is_completed, is_potential_assist,
                                   is_turnover, game_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            let mut insert_turnover = tx.prepare_cached(
                "INSERT INTO turnover (player_id, action_type, loc_x, loc_y, game_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for player in players {
                let (first_name, last_name) = player.name_parts();
                counts.players += insert_player
                    .execute(params![
                        player.player_id,
                        first_name,
                        last_name,
                        player.full_name(),
                        player.team_id,
                    ])
                    .context("Failed to insert player")?;

                for shot in &player.shots {
                    counts.shots += insert_shot
                        .execute(params![
                            player.player_id,
                            shot.action_type,
                            shot.shot_loc_x,
                            shot.shot_loc_y,
                            shot.points,
                            shot.game_id,
                        ])
                        .context("Failed to insert shot")?;
                }

                for pass in &player.passes {
                    counts.passes += insert_pass
                        .execute(params![
                            player.player_id,
                            pass.action_type,
                            pass.ball_start_loc_x,
                            pass.ball_start_loc_y,
                            pass.ball_end_loc_x,
                            pass.ball_end_loc_y,
                            pass.completed_pass,
                            pass.potential_assist,
                            pass.turnover,
                            pass.game_id,
                        ])
                        .context("Failed to insert pass")?;
                }

                for turnover in &player.turnovers {
                    counts.turnovers += insert_turnover
                        .execute(params![
                            player.player_id,
                            turnover.action_type,
                            turnover.tov_loc_x,
                            turnover.tov_loc_y,
                            turnover.game_id,
                        ])
                        .context("Failed to insert turnover")?;
                }
            }
        }

        tx.commit().context("Failed to commit player pass")?;
        Ok(counts)
    }

    /// Insert-or-ignore every game record, keyed on the feed's `id` field
    ///
    /// Missing rebound and assist counts default to 0; scores stay NULL
    /// when absent.
    pub fn load_games(&mut self, games: &[GameRecord]) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin game pass")?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO game (game_id, date, home_team_id, away_team_id,
                                             home_score, away_score, home_rebounds,
                                             away_rebounds, home_assists, away_assists)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for game in games {
                inserted += stmt
                    .execute(params![
                        game.id,
                        game.date,
                        game.home_team_id,
                        game.away_team_id,
                        game.home_score,
                        game.away_score,
                        game.home_rebounds.unwrap_or(0),
                        game.away_rebounds.unwrap_or(0),
                        game.home_assists.unwrap_or(0),
                        game.away_assists.unwrap_or(0),
                    ])
                    .context("Failed to insert game")?;
            }
        }

        tx.commit().context("Failed to commit game pass")?;
        Ok(inserted)
    }

    // ==================== Players ====================

    /// Look up a player identity row by its natural key
    pub fn player_by_id(&self, player_id: i64) -> Result<Option<PlayerRow>> {
        let result = self
            .conn
            .query_row(
                "SELECT player_id, first_name, last_name, full_name, team_id
                 FROM player WHERE player_id = ?1",
                params![player_id],
                |row| {
                    Ok(PlayerRow {
                        player_id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        full_name: row.get(3)?,
                        team_id: row.get(4)?,
                    })
                },
            )
            .optional()
            .context("Failed to look up player")?;

        Ok(result)
    }

    /// Get all players in storage order
    pub fn all_players(&self) -> Result<Vec<PlayerRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, first_name, last_name, full_name, team_id FROM player",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(PlayerRow {
                player_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                full_name: row.get(3)?,
                team_id: row.get(4)?,
            })
        })?;

        let mut players = Vec::new();
        for row in rows {
            players.push(row?);
        }

        Ok(players)
    }

    // ==================== Teams / Games ====================

    /// Get all teams in storage order
    pub fn all_teams(&self) -> Result<Vec<TeamRow>> {
        let mut stmt = self.conn.prepare("SELECT team_id, name FROM team")?;

        let rows = stmt.query_map([], |row| {
            Ok(TeamRow {
                team_id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        let mut teams = Vec::new();
        for row in rows {
            teams.push(row?);
        }

        Ok(teams)
    }

    /// Get all games in storage order
    pub fn all_games(&self) -> Result<Vec<GameRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT game_id, date, home_team_id, away_team_id, home_score, away_score,
                    home_rebounds, away_rebounds, home_assists, away_assists
             FROM game",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(GameRow {
                game_id: row.get(0)?,
                date: row.get(1)?,
                home_team_id: row.get(2)?,
                away_team_id: row.get(3)?,
                home_score: row.get(4)?,
                away_score: row.get(5)?,
                home_rebounds: row.get(6)?,
                away_rebounds: row.get(7)?,
                home_assists: row.get(8)?,
                away_assists: row.get(9)?,
            })
        })?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row?);
        }

        Ok(games)
    }

    // ==================== Events ====================

    /// Get all shots for a (player, action type) pair in storage order
    pub fn shots_for_action(&self, player_id: i64, action_type: &str) -> Result<Vec<ShotRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT loc_x, loc_y, points FROM shot
             WHERE player_id = ?1 AND action_type = ?2",
        )?;

        let rows = stmt.query_map(params![player_id, action_type], |row| {
            Ok(ShotRow {
                loc_x: row.get(0)?,
                loc_y: row.get(1)?,
                points: row.get(2)?,
            })
        })?;

        let mut shots = Vec::new();
        for row in rows {
            shots.push(row?);
        }

        Ok(shots)
    }

    /// Get all passes for a (player, action type) pair in storage order
    pub fn passes_for_action(&self, player_id: i64, action_type: &str) -> Result<Vec<PassRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT start_loc_x, start_loc_y, end_loc_x, end_loc_y,
                    is_completed, is_potential_assist, is_turnover
             FROM pass WHERE player_id = ?1 AND action_type = ?2",
        )?;

        let rows = stmt.query_map(params![player_id, action_type], |row| {
            Ok(PassRow {
                start_loc_x: row.get(0)?,
                start_loc_y: row.get(1)?,
                end_loc_x: row.get(2)?,
                end_loc_y: row.get(3)?,
                is_completed: row.get(4)?,
                is_potential_assist: row.get(5)?,
                is_turnover: row.get(6)?,
            })
        })?;

        let mut passes = Vec::new();
        for row in rows {
            passes.push(row?);
        }

        Ok(passes)
    }

    /// Get all turnovers for a (player, action type) pair in storage order
    pub fn turnovers_for_action(
        &self,
        player_id: i64,
        action_type: &str,
    ) -> Result<Vec<TurnoverRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT loc_x, loc_y FROM turnover
             WHERE player_id = ?1 AND action_type = ?2",
        )?;

        let rows = stmt.query_map(params![player_id, action_type], |row| {
            Ok(TurnoverRow {
                loc_x: row.get(0)?,
                loc_y: row.get(1)?,
            })
        })?;

        let mut turnovers = Vec::new();
        for row in rows {
            turnovers.push(row?);
        }

        Ok(turnovers)
    }

    // ==================== Statistics ====================

    /// Get row counts for all six tables
    pub fn stats(&self) -> Result<DatabaseStats> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
                .with_context(|| format!("Failed to count rows in {}", table))?;
            Ok(n as usize)
        };

        Ok(DatabaseStats {
            teams: count("team")?,
            players: count("player")?,
            games: count("game")?,
            shots: count("shot")?,
            passes: count("pass")?,
            turnovers: count("turnover")?,
        })
    }
}

/// Row counts written by the player pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerPassCounts {
    pub players: usize,
    pub shots: usize,
    pub passes: usize,
    pub turnovers: usize,
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    pub teams: usize,
    pub players: usize,
    pub games: usize,
    pub shots: usize,
    pub passes: usize,
    pub turnovers: usize,
}

/// Player projection, serialized as the players endpoint shape
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRow {
    #[serde(rename = "playerID")]
    pub player_id: Option<i64>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(rename = "teamID")]
    pub team_id: Option<i64>,
}

/// Team projection, serialized as the teams endpoint shape
#[derive(Debug, Clone, Serialize)]
pub struct TeamRow {
    #[serde(rename = "teamID")]
    pub team_id: Option<i64>,
    pub name: Option<String>,
}

/// Game projection, serialized as the games endpoint shape
#[derive(Debug, Clone, Serialize)]
pub struct GameRow {
    #[serde(rename = "gameID")]
    pub game_id: Option<i64>,
    pub date: Option<String>,
    #[serde(rename = "homeTeamID")]
    pub home_team_id: Option<i64>,
    #[serde(rename = "awayTeamID")]
    pub away_team_id: Option<i64>,
    #[serde(rename = "homeScore")]
    pub home_score: Option<i64>,
    #[serde(rename = "awayScore")]
    pub away_score: Option<i64>,
    #[serde(rename = "homeRebounds")]
    pub home_rebounds: Option<i64>,
    #[serde(rename = "awayRebounds")]
    pub away_rebounds: Option<i64>,
    #[serde(rename = "homeAssists")]
    pub home_assists: Option<i64>,
    #[serde(rename = "awayAssists")]
    pub away_assists: Option<i64>,
}

/// Shot event fields the aggregator consumes
#[derive(Debug, Clone)]
pub struct ShotRow {
    pub loc_x: Option<f64>,
    pub loc_y: Option<f64>,
    pub points: Option<i64>,
}

/// Pass event fields the aggregator consumes
#[derive(Debug, Clone)]
pub struct PassRow {
    pub start_loc_x: Option<f64>,
    pub start_loc_y: Option<f64>,
    pub end_loc_x: Option<f64>,
    pub end_loc_y: Option<f64>,
    pub is_completed: Option<bool>,
    pub is_potential_assist: Option<bool>,
    pub is_turnover: Option<bool>,
}

/// Turnover event fields the aggregator consumes
#[derive(Debug, Clone)]
pub struct TurnoverRow {
    pub loc_x: Option<f64>,
    pub loc_y: Option<f64>,
}
