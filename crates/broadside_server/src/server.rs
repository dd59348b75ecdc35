//! HTTP routes over a shared [`GameService`].
//!
//! Engine calls take locks and touch the database, so every handler runs
//! its call on the blocking pool.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use broadside_core::{
    BoardView, GameError, GameInfo, GameService, Position, Seat, SessionId, SessionPhase,
    SessionStore, ShipShape, ShotOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::util::MapRequestLayer;
use tracing::{debug, error, info, instrument, warn};

/// Service type the routes share; any store will do.
pub type SharedService = Arc<GameService<Arc<dyn SessionStore>>>;

/// Router state.
#[derive(Clone)]
pub struct AppState {
    service: SharedService,
}

impl AppState {
    /// Wraps a service for the router.
    pub fn new(service: SharedService) -> Self {
        Self { service }
    }

    /// The shared service.
    pub fn service(&self) -> &SharedService {
        &self.service
    }
}

/// Builds the game routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}", get(get_game_info).delete(remove_game))
        .route("/games/{id}/join", post(join_game))
        .route("/games/{id}/ships", post(place_ship))
        .route("/games/{id}/fleet", post(place_fleet))
        .route("/games/{id}/shots", post(shoot))
        .route("/games/{id}/boards/{seat}", get(get_board))
        .layer(MapRequestLayer::new(log_request))
        .with_state(state)
}

fn log_request(req: Request<Body>) -> Request<Body> {
    debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

// ─────────────────────────────────────────────────────────────
//  Request and response bodies
// ─────────────────────────────────────────────────────────────

/// Body of `POST /games` and `POST /games/{id}/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRequest {
    /// Display name.
    pub player_name: String,
}

/// Reply to `POST /games`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// New session id.
    pub session_id: SessionId,
    /// Seat assigned to the creator.
    pub seat: Seat,
}

/// Reply to `POST /games/{id}/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinedResponse {
    /// Seat assigned to the joiner.
    pub seat: Seat,
}

/// Body of `POST /games/{id}/ships`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceShipRequest {
    /// Owner of the ship.
    pub seat: Seat,
    /// Ship to place.
    pub ship: ShipShape,
}

/// Body of `POST /games/{id}/fleet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceFleetRequest {
    /// Owner of the fleet.
    pub seat: Seat,
    /// Every ship of the fleet.
    pub ships: Vec<ShipShape>,
}

/// Body of `POST /games/{id}/shots`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotRequest {
    /// Seat firing.
    pub seat: Seat,
    /// Target row.
    pub row: u8,
    /// Target column.
    pub col: u8,
}

/// Reply to `POST /games/{id}/shots`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotResponse {
    /// What the shot did.
    pub outcome: ShotOutcome,
    /// Seat expected to fire next.
    pub current_turn: Seat,
    /// Phase after the shot.
    pub phase: SessionPhase,
    /// Winner, once there is one.
    pub winner: Option<Seat>,
}

/// Reply to `GET /games`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesResponse {
    /// Every session id.
    pub games: Vec<SessionId>,
}

// ─────────────────────────────────────────────────────────────
//  Errors
// ─────────────────────────────────────────────────────────────

/// A failed call, rendered as `{"error": ...}` with a matching status.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// HTTP status of the failure.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let status = match &err {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::AlreadyFull
            | GameError::AlreadyExists(_)
            | GameError::NotYourTurn { .. }
            | GameError::GameOver => StatusCode::CONFLICT,
            GameError::InvalidPlacement(_) | GameError::OutOfBounds(_) | GameError::SeatVacant(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GameError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "Engine task failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, message = %self.message, "Request failed");
        } else {
            debug!(status = %self.status, message = %self.message, "Request rejected");
        }
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

/// Runs an engine call off the async workers.
async fn run<T, F>(state: &AppState, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&GameService<Arc<dyn SessionStore>>) -> Result<T, GameError> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    Ok(tokio::task::spawn_blocking(move || call(&service)).await??)
}

// ─────────────────────────────────────────────────────────────
//  Handlers
// ─────────────────────────────────────────────────────────────

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
    Json(body): Json<PlayerRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let (session_id, seat) = run(&state, move |s| s.create_game(body.player_name)).await?;
    info!(session_id = %session_id, "Game created over HTTP");
    Ok((StatusCode::CREATED, Json(CreatedResponse { session_id, seat })))
}

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> Json<GamesResponse> {
    Json(GamesResponse {
        games: state.service.list_games(),
    })
}

#[instrument(skip(state))]
async fn get_game_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameInfo>, ApiError> {
    Ok(Json(run(&state, move |s| s.get_game_info(&id)).await?))
}

#[instrument(skip(state))]
async fn remove_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run(&state, move |s| s.remove_game(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PlayerRequest>,
) -> Result<Json<JoinedResponse>, ApiError> {
    let seat = run(&state, move |s| s.join_game(&id, body.player_name)).await?;
    Ok(Json(JoinedResponse { seat }))
}

#[instrument(skip(state))]
async fn place_ship(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PlaceShipRequest>,
) -> Result<StatusCode, ApiError> {
    run(&state, move |s| s.place_ship(&id, body.seat, body.ship)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, body), fields(seat = %body.seat, ships = body.ships.len()))]
async fn place_fleet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PlaceFleetRequest>,
) -> Result<StatusCode, ApiError> {
    run(&state, move |s| s.place_fleet(&id, body.seat, &body.ships)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn shoot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ShotRequest>,
) -> Result<Json<ShotResponse>, ApiError> {
    let (outcome, info) = run(&state, move |s| {
        let outcome = s.shoot(&id, body.seat, Position::new(body.row, body.col))?;
        Ok((outcome, s.get_game_info(&id)?))
    })
    .await?;
    Ok(Json(ShotResponse {
        outcome,
        current_turn: info.current_turn,
        phase: info.phase,
        winner: info.winner,
    }))
}

#[instrument(skip(state))]
async fn get_board(
    State(state): State<AppState>,
    Path((id, seat)): Path<(String, Seat)>,
) -> Result<Json<BoardView>, ApiError> {
    Ok(Json(run(&state, move |s| s.get_board(&id, seat)).await?))
}
