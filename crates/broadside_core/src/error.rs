//! Error types for engine operations and the persistence collaborator.

use crate::placement::PlacementError;
use crate::position::Position;
use crate::session::{Seat, SessionId};
use derive_more::{Display, Error};
use tracing::instrument;

/// Why an engine operation was rejected.
///
/// Every rejection leaves the session exactly as it was. A repeat shot is
/// not an error; see [`crate::ShotOutcome::AlreadyShot`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameError {
    /// No session with this id.
    #[display("Session '{}' not found", _0)]
    NotFound(SessionId),

    /// A session with this id already exists.
    #[display("Session '{}' already exists", _0)]
    AlreadyExists(SessionId),

    /// Seat 2 is already taken.
    #[display("Session is full")]
    AlreadyFull,

    /// Placement broke a rule.
    #[display("Invalid placement: {}", _0)]
    InvalidPlacement(PlacementError),

    /// Fired out of turn.
    #[display("Not your turn; waiting for {}", expected)]
    NotYourTurn {
        /// Seat whose turn it is.
        expected: Seat,
    },

    /// The seat has no player yet.
    #[display("Seat {} is empty", _0)]
    SeatVacant(Seat),

    /// Shot target off the board.
    #[display("Position {} is off the board", _0)]
    OutOfBounds(Position),

    /// The session already has a winner.
    #[display("Game is already over")]
    GameOver,

    /// The store could not record the change.
    #[display("{}", _0)]
    Store(StoreError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::InvalidPlacement(e) => Some(e),
            GameError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PlacementError> for GameError {
    fn from(err: PlacementError) -> Self {
        GameError::InvalidPlacement(err)
    }
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        GameError::Store(err)
    }
}

/// Persistence failure with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Record encoding error: {}", err))
    }
}
