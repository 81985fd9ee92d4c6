//! HTTP query surface
//!
//! Thin axum layer over the storage projections and the summary
//! aggregator. All endpoints are read-only; the single database connection
//! sits behind a mutex and handlers hold it only for the duration of one
//! query.

use crate::storage::{Database, GameRow, PlayerRow, TeamRow};
use crate::summary::{self, PlayerSummary};
use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared state behind every handler
pub struct AppState {
    db: Mutex<Database>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal(anyhow::anyhow!("database lock poisoned")))
    }
}

/// Errors surfaced at the HTTP boundary
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("player not found")]
    PlayerNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::PlayerNotFound => (StatusCode::NOT_FOUND, "player not found"),
            ApiError::Internal(err) => {
                error!("request failed: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/playerSummary/{player_id}", get(player_summary))
        .route("/api/v1/players", get(list_players))
        .route("/api/v1/teams", get(list_teams))
        .route("/api/v1/games", get(list_games))
        .with_state(state)
}

/// Bind and serve the API until the process is stopped
pub async fn serve(
    state: Arc<AppState>,
    addr: SocketAddr,
    cors_origin: Option<&str>,
) -> Result<()> {
    let app = router(state).layer(cors_layer(cors_origin)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    axum::serve(listener, app).await.context("HTTP server error")?;

    Ok(())
}

/// CORS for the browser frontend; permissive unless an origin is pinned
fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let layer = match origin {
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };
    Ok(layer)
}

async fn player_summary(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> Result<Json<PlayerSummary>, ApiError> {
    let db = state.db()?;
    let summary = summary::summarize(&db, player_id)?;
    summary.map(Json).ok_or(ApiError::PlayerNotFound)
}

async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlayerRow>>, ApiError> {
    let db = state.db()?;
    Ok(Json(db.all_players()?))
}

async fn list_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TeamRow>>, ApiError> {
    let db = state.db()?;
    Ok(Json(db.all_teams()?))
}

async fn list_games(State(state): State<Arc<AppState>>) -> Result<Json<Vec<GameRow>>, ApiError> {
    let db = state.db()?;
    Ok(Json(db.all_games()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{self, GameRecord, PlayerRecord, ShotRecord, TeamRecord};

    fn fixture_state() -> Arc<AppState> {
        let mut db = Database::open_in_memory().unwrap();
        db.reset_schema().unwrap();

        let teams = vec![TeamRecord {
            team_id: Some(1),
            name: Some("Thunder".to_string()),
        }];
        let players = vec![PlayerRecord {
            player_id: Some(1),
            name: Some("Jane Doe".to_string()),
            team_id: Some(1),
            shots: vec![ShotRecord {
                action_type: Some("pickAndRoll".to_string()),
                shot_loc_x: Some(10.0),
                shot_loc_y: Some(5.0),
                points: Some(2),
                game_id: Some(100),
            }],
            ..Default::default()
        }];
        let games = vec![GameRecord {
            id: Some(100),
            home_team_id: Some(1),
            away_team_id: Some(2),
            ..Default::default()
        }];
        ingest::load(&mut db, &teams, &players, &games).unwrap();

        Arc::new(AppState::new(db))
    }

    #[tokio::test]
    async fn test_player_summary_endpoint() {
        let state = fixture_state();
        let Json(summary) = player_summary(State(state), Path(1)).await.unwrap();

        assert_eq!(summary.name, "Jane Doe");
        assert_eq!(summary.total_points, 2);
        assert_eq!(summary.pick_and_roll_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_player_maps_to_not_found() {
        let state = fixture_state();
        let result = player_summary(State(state), Path(999)).await;

        assert!(matches!(result, Err(ApiError::PlayerNotFound)));
    }

    #[tokio::test]
    async fn test_not_found_response_is_404_with_error_body() {
        let response = ApiError::PlayerNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "player not found");
    }

    #[tokio::test]
    async fn test_list_endpoints_project_all_rows() {
        let state = fixture_state();

        let Json(players) = list_players(State(state.clone())).await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].full_name.as_deref(), Some("Jane Doe"));

        let Json(teams) = list_teams(State(state.clone())).await.unwrap();
        assert_eq!(teams.len(), 1);

        let Json(games) = list_games(State(state)).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, Some(100));
        assert_eq!(games[0].home_rebounds, Some(0));
    }

    #[test]
    fn test_cors_layer_rejects_malformed_origin() {
        assert!(cors_layer(Some("not\na\nheader")).is_err());
    }
}
