//! Per-player aggregation over the normalized event tables
//!
//! Rolls shot/pass/turnover rows up into one [`PlayerSummary`]: a detail
//! block per recognized action type plus player-level totals summed across
//! the four blocks. Events whose action type is not one of the four
//! recognized categories appear nowhere in the result.

use crate::storage::{Database, PassRow, PlayerRow, ShotRow, TurnoverRow};
use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// The four recognized offensive action categories
///
/// Stored and serialized under the feed's own spelling (`pickAndRoll`,
/// `isolation`, `postUp`, `offBallScreen`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    PickAndRoll,
    Isolation,
    PostUp,
    OffBallScreen,
}

impl ActionType {
    /// All categories, in response order
    pub const ALL: [ActionType; 4] = [
        ActionType::PickAndRoll,
        ActionType::Isolation,
        ActionType::PostUp,
        ActionType::OffBallScreen,
    ];

    /// The wire and storage spelling of this category
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::PickAndRoll => "pickAndRoll",
            ActionType::Isolation => "isolation",
            ActionType::PostUp => "postUp",
            ActionType::OffBallScreen => "offBallScreen",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A shot as returned inside a summary detail block
#[derive(Debug, Clone, Serialize)]
pub struct ShotDetail {
    pub loc: [Option<f64>; 2],
    pub points: Option<i64>,
}

impl From<ShotRow> for ShotDetail {
    fn from(row: ShotRow) -> Self {
        Self {
            loc: [row.loc_x, row.loc_y],
            points: row.points,
        }
    }
}

/// A pass as returned inside a summary detail block
#[derive(Debug, Clone, Serialize)]
pub struct PassDetail {
    #[serde(rename = "startLoc")]
    pub start_loc: [Option<f64>; 2],
    #[serde(rename = "endLoc")]
    pub end_loc: [Option<f64>; 2],
    #[serde(rename = "isCompleted")]
    pub is_completed: Option<bool>,
    #[serde(rename = "isPotentialAssist")]
    pub is_potential_assist: Option<bool>,
    #[serde(rename = "isTurnover")]
    pub is_turnover: Option<bool>,
}

impl From<PassRow> for PassDetail {
    fn from(row: PassRow) -> Self {
        Self {
            start_loc: [row.start_loc_x, row.start_loc_y],
            end_loc: [row.end_loc_x, row.end_loc_y],
            is_completed: row.is_completed,
            is_potential_assist: row.is_potential_assist,
            is_turnover: row.is_turnover,
        }
    }
}

/// A turnover as returned inside a summary detail block
#[derive(Debug, Clone, Serialize)]
pub struct TurnoverDetail {
    pub loc: [Option<f64>; 2],
}

impl From<TurnoverRow> for TurnoverDetail {
    fn from(row: TurnoverRow) -> Self {
        Self {
            loc: [row.loc_x, row.loc_y],
        }
    }
}

/// Metrics and raw events for one (player, action type) bucket
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBreakdown {
    pub total_shot_attempts: i64,
    pub total_points: i64,
    pub total_passes: i64,
    pub total_potential_assists: i64,
    pub total_turnovers: i64,
    pub total_passing_turnovers: i64,
    pub shots: Vec<ShotDetail>,
    pub passes: Vec<PassDetail>,
    pub turnovers: Vec<TurnoverDetail>,
}

impl ActionBreakdown {
    /// Compute the six metrics from the raw rows of one bucket
    ///
    /// Missing shot points count as 0. A passing turnover counts toward
    /// `total_passing_turnovers` only; `total_turnovers` counts the
    /// dedicated turnover events.
    pub fn from_rows(
        shots: Vec<ShotRow>,
        passes: Vec<PassRow>,
        turnovers: Vec<TurnoverRow>,
    ) -> Self {
        let total_points = shots.iter().map(|s| s.points.unwrap_or(0)).sum();
        let total_potential_assists = passes
            .iter()
            .filter(|p| p.is_potential_assist.unwrap_or(false))
            .count() as i64;
        let total_passing_turnovers = passes
            .iter()
            .filter(|p| p.is_turnover.unwrap_or(false))
            .count() as i64;

        Self {
            total_shot_attempts: shots.len() as i64,
            total_points,
            total_passes: passes.len() as i64,
            total_potential_assists,
            total_turnovers: turnovers.len() as i64,
            total_passing_turnovers,
            shots: shots.into_iter().map(ShotDetail::from).collect(),
            passes: passes.into_iter().map(PassDetail::from).collect(),
            turnovers: turnovers.into_iter().map(TurnoverDetail::from).collect(),
        }
    }

    /// Actions in this bucket: shot attempts + passes + turnover events
    ///
    /// Passing turnovers are already passes and are not added again.
    pub fn action_count(&self) -> i64 {
        self.total_shot_attempts + self.total_passes + self.total_turnovers
    }
}

/// Full per-player rollup as served by the playerSummary endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    #[serde(rename = "playerID")]
    pub player_id: Option<i64>,
    #[serde(rename = "totalShotAttempts")]
    pub total_shot_attempts: i64,
    #[serde(rename = "totalPoints")]
    pub total_points: i64,
    #[serde(rename = "totalPasses")]
    pub total_passes: i64,
    #[serde(rename = "totalPotentialAssists")]
    pub total_potential_assists: i64,
    #[serde(rename = "totalTurnovers")]
    pub total_turnovers: i64,
    #[serde(rename = "totalPassingTurnovers")]
    pub total_passing_turnovers: i64,
    #[serde(rename = "pickAndRollCount")]
    pub pick_and_roll_count: i64,
    #[serde(rename = "isolationCount")]
    pub isolation_count: i64,
    #[serde(rename = "postUpCount")]
    pub post_up_count: i64,
    #[serde(rename = "offBallScreenCount")]
    pub off_ball_screen_count: i64,
    #[serde(rename = "pickAndRoll")]
    pub pick_and_roll: ActionBreakdown,
    pub isolation: ActionBreakdown,
    #[serde(rename = "postUp")]
    pub post_up: ActionBreakdown,
    #[serde(rename = "offBallScreen")]
    pub off_ball_screen: ActionBreakdown,
}

impl PlayerSummary {
    fn empty(player: &PlayerRow) -> Self {
        Self {
            name: player.full_name.clone().unwrap_or_default(),
            player_id: player.player_id,
            total_shot_attempts: 0,
            total_points: 0,
            total_passes: 0,
            total_potential_assists: 0,
            total_turnovers: 0,
            total_passing_turnovers: 0,
            pick_and_roll_count: 0,
            isolation_count: 0,
            post_up_count: 0,
            off_ball_screen_count: 0,
            pick_and_roll: ActionBreakdown::default(),
            isolation: ActionBreakdown::default(),
            post_up: ActionBreakdown::default(),
            off_ball_screen: ActionBreakdown::default(),
        }
    }

    /// Fold one category's breakdown into the player-level totals
    fn add_breakdown(&mut self, action: ActionType, breakdown: ActionBreakdown) {
        self.total_shot_attempts += breakdown.total_shot_attempts;
        self.total_points += breakdown.total_points;
        self.total_passes += breakdown.total_passes;
        self.total_potential_assists += breakdown.total_potential_assists;
        self.total_turnovers += breakdown.total_turnovers;
        self.total_passing_turnovers += breakdown.total_passing_turnovers;

        let count = breakdown.action_count();
        match action {
            ActionType::PickAndRoll => {
                self.pick_and_roll_count = count;
                self.pick_and_roll = breakdown;
            }
            ActionType::Isolation => {
                self.isolation_count = count;
                self.isolation = breakdown;
            }
            ActionType::PostUp => {
                self.post_up_count = count;
                self.post_up = breakdown;
            }
            ActionType::OffBallScreen => {
                self.off_ball_screen_count = count;
                self.off_ball_screen = breakdown;
            }
        }
    }
}

/// Compute the summary for one player, or `None` when the player is unknown
///
/// A known player with no events in any category yields an all-zero
/// summary with empty event lists.
pub fn summarize(db: &Database, player_id: i64) -> Result<Option<PlayerSummary>> {
    let Some(player) = db.player_by_id(player_id)? else {
        return Ok(None);
    };

    let mut summary = PlayerSummary::empty(&player);
    for action in ActionType::ALL {
        let shots = db.shots_for_action(player_id, action.as_str())?;
        let passes = db.passes_for_action(player_id, action.as_str())?;
        let turnovers = db.turnovers_for_action(player_id, action.as_str())?;
        summary.add_breakdown(action, ActionBreakdown::from_rows(shots, passes, turnovers));
    }

    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{PassRecord, PlayerRecord, ShotRecord, TurnoverRecord};

    fn loaded_db(players: Vec<PlayerRecord>) -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.reset_schema().unwrap();
        db.load_players(&players).unwrap();
        db
    }

    fn shot(action: &str, points: i64) -> ShotRecord {
        ShotRecord {
            action_type: Some(action.to_string()),
            shot_loc_x: Some(10.0),
            shot_loc_y: Some(5.0),
            points: Some(points),
            game_id: Some(100),
        }
    }

    fn pass(action: &str, completed: bool, assist: bool, turnover: bool) -> PassRecord {
        PassRecord {
            action_type: Some(action.to_string()),
            completed_pass: Some(completed),
            potential_assist: Some(assist),
            turnover: Some(turnover),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_player_is_none() {
        let db = loaded_db(vec![]);
        assert!(summarize(&db, 42).unwrap().is_none());
    }

    #[test]
    fn test_player_without_events_has_all_zero_summary() {
        let db = loaded_db(vec![PlayerRecord {
            player_id: Some(1),
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        }]);

        let summary = summarize(&db, 1).unwrap().unwrap();
        assert_eq!(summary.name, "Jane Doe");
        assert_eq!(summary.player_id, Some(1));
        assert_eq!(summary.total_shot_attempts, 0);
        assert_eq!(summary.total_points, 0);
        assert_eq!(summary.pick_and_roll_count, 0);
        assert!(summary.pick_and_roll.shots.is_empty());
    }

    #[test]
    fn test_worked_example() {
        // One pick-and-roll shot worth 2, one clean isolation pass.
        let db = loaded_db(vec![PlayerRecord {
            player_id: Some(1),
            name: Some("Jane Doe".to_string()),
            shots: vec![shot("pickAndRoll", 2)],
            passes: vec![pass("isolation", true, false, false)],
            ..Default::default()
        }]);

        let summary = summarize(&db, 1).unwrap().unwrap();
        assert_eq!(summary.total_shot_attempts, 1);
        assert_eq!(summary.total_points, 2);
        assert_eq!(summary.total_passes, 1);
        assert_eq!(summary.total_potential_assists, 0);
        assert_eq!(summary.total_turnovers, 0);
        assert_eq!(summary.total_passing_turnovers, 0);
        assert_eq!(summary.pick_and_roll_count, 1);
        assert_eq!(summary.isolation_count, 1);
        assert_eq!(summary.post_up_count, 0);
        assert_eq!(summary.off_ball_screen_count, 0);

        assert_eq!(summary.pick_and_roll.shots.len(), 1);
        assert_eq!(summary.pick_and_roll.shots[0].loc, [Some(10.0), Some(5.0)]);
        assert_eq!(summary.isolation.passes.len(), 1);
    }

    #[test]
    fn test_totals_are_sums_across_categories() {
        let db = loaded_db(vec![PlayerRecord {
            player_id: Some(1),
            name: Some("Jane Doe".to_string()),
            shots: vec![
                shot("pickAndRoll", 2),
                shot("pickAndRoll", 3),
                shot("isolation", 2),
                shot("postUp", 0),
                shot("offBallScreen", 3),
            ],
            passes: vec![
                pass("pickAndRoll", true, true, false),
                pass("postUp", false, false, true),
            ],
            turnovers: vec![TurnoverRecord {
                action_type: Some("isolation".to_string()),
                tov_loc_x: Some(1.0),
                tov_loc_y: Some(2.0),
                game_id: Some(100),
            }],
            ..Default::default()
        }]);

        let summary = summarize(&db, 1).unwrap().unwrap();

        let categories = [
            &summary.pick_and_roll,
            &summary.isolation,
            &summary.post_up,
            &summary.off_ball_screen,
        ];
        let points: i64 = categories.iter().map(|c| c.total_points).sum();
        let attempts: i64 = categories.iter().map(|c| c.total_shot_attempts).sum();
        assert_eq!(summary.total_points, points);
        assert_eq!(summary.total_shot_attempts, attempts);

        assert_eq!(summary.total_points, 10);
        assert_eq!(summary.total_shot_attempts, 5);
        assert_eq!(summary.pick_and_roll.total_points, 5);
        assert_eq!(summary.isolation.total_points, 2);

        // Action counts are shots + passes + turnover events per category.
        assert_eq!(summary.pick_and_roll_count, 3);
        assert_eq!(summary.isolation_count, 2);
        assert_eq!(summary.post_up_count, 2);
        assert_eq!(summary.off_ball_screen_count, 1);
    }

    #[test]
    fn test_passing_turnover_is_not_double_counted() {
        // An incomplete pass flagged as a turnover counts once as a pass and
        // once as a passing turnover, never in the turnover-event total.
        let db = loaded_db(vec![PlayerRecord {
            player_id: Some(1),
            name: Some("Jane Doe".to_string()),
            passes: vec![pass("pickAndRoll", false, false, true)],
            ..Default::default()
        }]);

        let summary = summarize(&db, 1).unwrap().unwrap();
        assert_eq!(summary.total_passes, 1);
        assert_eq!(summary.total_passing_turnovers, 1);
        assert_eq!(summary.total_turnovers, 0);
        assert_eq!(summary.pick_and_roll_count, 1);
    }

    #[test]
    fn test_unrecognized_action_types_are_excluded_everywhere() {
        let db = loaded_db(vec![PlayerRecord {
            player_id: Some(1),
            name: Some("Jane Doe".to_string()),
            shots: vec![shot("transition", 2), shot("pickAndRoll", 3)],
            passes: vec![pass("handOff", true, true, false)],
            turnovers: vec![TurnoverRecord {
                action_type: None,
                ..Default::default()
            }],
            ..Default::default()
        }]);

        let summary = summarize(&db, 1).unwrap().unwrap();
        assert_eq!(summary.total_shot_attempts, 1);
        assert_eq!(summary.total_points, 3);
        assert_eq!(summary.total_passes, 0);
        assert_eq!(summary.total_potential_assists, 0);
        assert_eq!(summary.total_turnovers, 0);
        assert_eq!(summary.pick_and_roll_count, 1);
        assert_eq!(summary.isolation_count, 0);
    }

    #[test]
    fn test_missing_shot_points_count_as_zero() {
        let db = loaded_db(vec![PlayerRecord {
            player_id: Some(1),
            name: Some("Jane Doe".to_string()),
            shots: vec![
                ShotRecord {
                    action_type: Some("postUp".to_string()),
                    ..Default::default()
                },
                shot("postUp", 2),
            ],
            ..Default::default()
        }]);

        let summary = summarize(&db, 1).unwrap().unwrap();
        assert_eq!(summary.post_up.total_shot_attempts, 2);
        assert_eq!(summary.post_up.total_points, 2);
        assert_eq!(summary.post_up.shots[0].points, None);
    }

    #[test]
    fn test_summary_serializes_with_wire_field_names() {
        let db = loaded_db(vec![PlayerRecord {
            player_id: Some(1),
            name: Some("Jane Doe".to_string()),
            shots: vec![shot("pickAndRoll", 2)],
            passes: vec![pass("isolation", true, false, false)],
            ..Default::default()
        }]);

        let summary = summarize(&db, 1).unwrap().unwrap();
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["name"], "Jane Doe");
        assert_eq!(value["playerID"], 1);
        assert_eq!(value["totalShotAttempts"], 1);
        assert_eq!(value["pickAndRollCount"], 1);
        assert_eq!(value["pickAndRoll"]["totalPoints"], 2);
        assert_eq!(value["pickAndRoll"]["shots"][0]["loc"][0], 10.0);
        assert_eq!(value["isolation"]["passes"][0]["isCompleted"], true);
        assert_eq!(value["offBallScreen"]["turnovers"], serde_json::json!([]));
    }

    #[test]
    fn test_action_type_display_matches_wire_spelling() {
        assert_eq!(ActionType::PickAndRoll.to_string(), "pickAndRoll");
        assert_eq!(ActionType::OffBallScreen.as_str(), "offBallScreen");
    }
}
