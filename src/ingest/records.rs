//! Source record types for the three input collections
//!
//! The feeds are loosely typed: every field is optional and unknown fields
//! are ignored. A missing value degrades to NULL in storage rather than
//! failing the load.

use chrono::NaiveDate;
use serde::Deserialize;

/// One entry of the teams collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamRecord {
    pub team_id: Option<i64>,
    pub name: Option<String>,
}

/// One entry of the players collection, with its nested event lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerRecord {
    pub player_id: Option<i64>,
    /// Single display name; split into first/last at load time
    pub name: Option<String>,
    pub team_id: Option<i64>,
    #[serde(default)]
    pub shots: Vec<ShotRecord>,
    #[serde(default)]
    pub passes: Vec<PassRecord>,
    #[serde(default)]
    pub turnovers: Vec<TurnoverRecord>,
}

impl PlayerRecord {
    /// Derive (first, last) name parts from the display name
    ///
    /// The first whitespace token becomes the first name and the remainder,
    /// joined with single spaces, the last name. Both are empty when the
    /// name is absent; the last name is empty for single-token names.
    pub fn name_parts(&self) -> (String, String) {
        let name = self.name.as_deref().unwrap_or("");
        let mut tokens = name.split_whitespace();
        let first = tokens.next().unwrap_or("").to_string();
        let last = tokens.collect::<Vec<_>>().join(" ");
        (first, last)
    }

    /// The display name preserved verbatim, empty when absent
    pub fn full_name(&self) -> String {
        self.name.clone().unwrap_or_default()
    }
}

/// A nested shot event on a player record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShotRecord {
    pub action_type: Option<String>,
    pub shot_loc_x: Option<f64>,
    pub shot_loc_y: Option<f64>,
    pub points: Option<i64>,
    pub game_id: Option<i64>,
}

/// A nested pass event on a player record
///
/// The three flags are independent; a pass can be a turnover without being
/// completed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassRecord {
    pub action_type: Option<String>,
    pub ball_start_loc_x: Option<f64>,
    pub ball_start_loc_y: Option<f64>,
    pub ball_end_loc_x: Option<f64>,
    pub ball_end_loc_y: Option<f64>,
    pub completed_pass: Option<bool>,
    pub potential_assist: Option<bool>,
    pub turnover: Option<bool>,
    pub game_id: Option<i64>,
}

/// A nested turnover event on a player record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnoverRecord {
    pub action_type: Option<String>,
    pub tov_loc_x: Option<f64>,
    pub tov_loc_y: Option<f64>,
    pub game_id: Option<i64>,
}

/// One entry of the games collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameRecord {
    /// The feed calls the game's natural key plain `id`
    pub id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub home_rebounds: Option<i64>,
    pub away_rebounds: Option<i64>,
    pub home_assists: Option<i64>,
    pub away_assists: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_parts_splits_on_whitespace() {
        let player = PlayerRecord {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(
            player.name_parts(),
            ("Jane".to_string(), "Doe".to_string())
        );
    }

    #[test]
    fn test_name_parts_single_token_has_empty_last_name() {
        let player = PlayerRecord {
            name: Some("Nene".to_string()),
            ..Default::default()
        };
        assert_eq!(player.name_parts(), ("Nene".to_string(), String::new()));
    }

    #[test]
    fn test_name_parts_joins_remaining_tokens() {
        let player = PlayerRecord {
            name: Some("Juan Carlos Navarro".to_string()),
            ..Default::default()
        };
        assert_eq!(
            player.name_parts(),
            ("Juan".to_string(), "Carlos Navarro".to_string())
        );
    }

    #[test]
    fn test_name_parts_missing_name_is_empty() {
        let player = PlayerRecord::default();
        assert_eq!(player.name_parts(), (String::new(), String::new()));
        assert_eq!(player.full_name(), "");
    }

    #[test]
    fn test_player_record_parses_nested_events() {
        let raw = r#"{
            "player_id": 1,
            "name": "Jane Doe",
            "team_id": 10,
            "shots": [
                {"action_type": "pickAndRoll", "shot_loc_x": 10.0, "shot_loc_y": 5.0, "points": 2, "game_id": 100}
            ],
            "passes": [
                {"action_type": "isolation", "completed_pass": true, "potential_assist": false, "turnover": false}
            ],
            "turnovers": []
        }"#;

        let player: PlayerRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(player.player_id, Some(1));
        assert_eq!(player.shots.len(), 1);
        assert_eq!(player.shots[0].points, Some(2));
        assert_eq!(player.passes[0].completed_pass, Some(true));
        assert!(player.turnovers.is_empty());
    }

    #[test]
    fn test_records_tolerate_missing_and_unknown_fields() {
        let player: PlayerRecord =
            serde_json::from_str(r#"{"player_id": 3, "jersey": 35}"#).unwrap();
        assert_eq!(player.player_id, Some(3));
        assert_eq!(player.name, None);
        assert!(player.shots.is_empty());

        let game: GameRecord =
            serde_json::from_str(r#"{"id": 100, "date": "2023-01-15"}"#).unwrap();
        assert_eq!(game.id, Some(100));
        assert_eq!(
            game.date,
            Some(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())
        );
        assert_eq!(game.home_rebounds, None);
    }
}
