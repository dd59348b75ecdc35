//! Typed storage records and their versioned JSON encoding.
//!
//! Fleets are stored as ship shapes and shots as ordered position pairs.
//! Hits are never stored; they are recomputed by replaying shots when a
//! session is restored.

use crate::board::Board;
use crate::error::StoreError;
use crate::placement::PlacementValidator;
use crate::position::Position;
use crate::session::{Seat, Session, SessionId};
use crate::ship::ShipShape;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Encoding version written by this build.
pub const RECORD_VERSION: u8 = 1;

fn check_version(found: u8) -> Result<(), StoreError> {
    if found != RECORD_VERSION {
        return Err(StoreError::new(format!(
            "Unsupported record version {} (expected {})",
            found, RECORD_VERSION
        )));
    }
    Ok(())
}

/// One seat's placed ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetRecord {
    /// Encoding version.
    pub v: u8,
    /// Ships in placement order.
    pub ships: Vec<ShipShape>,
}

impl Default for FleetRecord {
    fn default() -> Self {
        Self {
            v: RECORD_VERSION,
            ships: Vec::new(),
        }
    }
}

impl FleetRecord {
    /// Snapshot of `board`'s ships.
    pub fn of(board: &Board) -> Self {
        Self {
            v: RECORD_VERSION,
            ships: board.ships().iter().map(|s| s.shape()).collect(),
        }
    }

    /// JSON form.
    pub fn encode(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and version-checks the JSON form.
    pub fn decode(s: &str) -> Result<Self, StoreError> {
        let record: Self = serde_json::from_str(s)?;
        check_version(record.v)?;
        Ok(record)
    }
}

/// Positions fired at one seat's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotsRecord {
    /// Encoding version.
    pub v: u8,
    /// `[row, col]` pairs in row-major order.
    pub shots: Vec<(u8, u8)>,
}

impl Default for ShotsRecord {
    fn default() -> Self {
        Self {
            v: RECORD_VERSION,
            shots: Vec::new(),
        }
    }
}

impl ShotsRecord {
    /// Snapshot of the shots fired at `board`.
    pub fn of(board: &Board) -> Self {
        Self {
            v: RECORD_VERSION,
            shots: board.shots().iter().map(|p| (p.row, p.col)).collect(),
        }
    }

    /// Shots as positions.
    pub fn positions(&self) -> Vec<Position> {
        self.shots.iter().copied().map(Position::from).collect()
    }

    /// JSON form.
    pub fn encode(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and version-checks the JSON form.
    pub fn decode(s: &str) -> Result<Self, StoreError> {
        let record: Self = serde_json::from_str(s)?;
        check_version(record.v)?;
        Ok(record)
    }
}

/// Everything the store keeps about one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session id.
    pub id: SessionId,
    /// Seat 1 name.
    pub player1: String,
    /// Seat 2 name.
    pub player2: Option<String>,
    /// Fleets, indexed Player1 then Player2.
    pub fleets: [FleetRecord; 2],
    /// Shots received, indexed Player1 then Player2.
    pub shots: [ShotsRecord; 2],
    /// Seat expected to fire next.
    pub current_turn: Seat,
}

impl SessionRecord {
    /// Snapshot of a live session.
    pub fn of(session: &Session) -> Self {
        let p1 = session.board(Seat::Player1);
        let p2 = session.board(Seat::Player2);
        Self {
            id: session.id().clone(),
            player1: session.player_name(Seat::Player1).unwrap_or_default().to_string(),
            player2: session.player_name(Seat::Player2).map(str::to_string),
            fleets: [FleetRecord::of(p1), FleetRecord::of(p2)],
            shots: [ShotsRecord::of(p1), ShotsRecord::of(p2)],
            current_turn: session.current_turn(),
        }
    }

    /// Rebuilds the live session, re-validating every stored ship.
    #[instrument(skip(self, validator), fields(session_id = %self.id))]
    pub fn into_session(self, validator: &PlacementValidator) -> Result<Session, StoreError> {
        let board = |i: usize| {
            Board::from_parts(&self.fleets[i].ships, &self.shots[i].positions(), validator)
                .map_err(|e| StoreError::new(format!("Stored fleet is invalid: {}", e)))
        };
        let boards = [board(0)?, board(1)?];
        debug!("Session record decoded");
        Ok(Session::from_parts(
            self.id,
            self.player1,
            self.player2,
            boards,
            self.current_turn,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::Orientation;

    #[test]
    fn test_fleet_wire_format() {
        let record = FleetRecord {
            v: 1,
            ships: vec![ShipShape::new(2, Orientation::Vertical, Position::new(1, 2))],
        };
        let json = record.encode().unwrap();
        assert_eq!(
            json,
            r#"{"v":1,"ships":[{"size":2,"orientation":"vertical","origin":{"row":1,"col":2}}]}"#
        );
    }

    #[test]
    fn test_shots_wire_format() {
        let record = ShotsRecord {
            v: 1,
            shots: vec![(0, 0), (9, 3)],
        };
        assert_eq!(record.encode().unwrap(), r#"{"v":1,"shots":[[0,0],[9,3]]}"#);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = ShotsRecord::decode(r#"{"v":2,"shots":[]}"#).unwrap_err();
        assert!(err.message.contains("version 2"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(FleetRecord::decode("4,0,0,1").is_err());
    }
}
