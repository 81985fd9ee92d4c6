//! Database schema definition

/// Drop statements for a full rebuild, children before parents
pub const DROP_TABLES: &str = r#"
DROP TABLE IF EXISTS shot;
DROP TABLE IF EXISTS pass;
DROP TABLE IF EXISTS turnover;
DROP TABLE IF EXISTS game;
DROP TABLE IF EXISTS player;
DROP TABLE IF EXISTS team;
"#;

/// SQL schema for the courtline database
///
/// The `REFERENCES` clauses document the relational model; foreign-key
/// enforcement is never enabled on the connection. Event rows may point at
/// players or games that were absent from the source feeds.
pub const SCHEMA: &str = r#"
-- Teams, referenced by players and games
CREATE TABLE team (
    id INTEGER PRIMARY KEY,
    team_id INTEGER UNIQUE,
    name TEXT UNIQUE
);

-- Players, keyed by the feed's player_id; team link is optional
CREATE TABLE player (
    id INTEGER PRIMARY KEY,
    player_id INTEGER UNIQUE,
    first_name TEXT,
    last_name TEXT,
    full_name TEXT,
    team_id INTEGER REFERENCES team(team_id)
);

-- Games between two teams
CREATE TABLE game (
    id INTEGER PRIMARY KEY,
    game_id INTEGER UNIQUE,
    date TEXT,
    home_team_id INTEGER REFERENCES team(team_id),
    away_team_id INTEGER REFERENCES team(team_id),
    home_score INTEGER,
    away_score INTEGER,
    home_rebounds INTEGER,
    away_rebounds INTEGER,
    home_assists INTEGER,
    away_assists INTEGER
);

-- Shot events, append-only
CREATE TABLE shot (
    id INTEGER PRIMARY KEY,
    player_id INTEGER REFERENCES player(player_id),
    action_type TEXT,
    loc_x REAL,
    loc_y REAL,
    points INTEGER,
    game_id INTEGER
);

-- Pass events, append-only; the three flags are independent of each other
CREATE TABLE pass (
    id INTEGER PRIMARY KEY,
    player_id INTEGER REFERENCES player(player_id),
    action_type TEXT,
    start_loc_x REAL,
    start_loc_y REAL,
    end_loc_x REAL,
    end_loc_y REAL,
    is_completed INTEGER,
    is_potential_assist INTEGER,
    is_turnover INTEGER,
    game_id INTEGER
);

-- Turnover events, append-only
CREATE TABLE turnover (
    id INTEGER PRIMARY KEY,
    player_id INTEGER REFERENCES player(player_id),
    action_type TEXT,
    loc_x REAL,
    loc_y REAL,
    game_id INTEGER
);

CREATE INDEX idx_shot_player_action ON shot(player_id, action_type);
CREATE INDEX idx_pass_player_action ON pass(player_id, action_type);
CREATE INDEX idx_turnover_player_action ON turnover(player_id, action_type);
"#;
