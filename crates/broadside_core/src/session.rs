//! A two-seat session and its turn state machine.

use crate::board::{Board, ShipView, TargetMark};
use crate::error::GameError;
use crate::placement::{PlacementError, PlacementValidator};
use crate::position::Position;
use crate::ship::{Ship, ShipShape};
use crate::shot::ShotOutcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// A player's role within a session, distinct from their display name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Seat {
    /// The creator; fires first.
    Player1,
    /// The player who joined.
    Player2,
}

impl Seat {
    /// The other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Seat::Player1 => 0,
            Seat::Player2 => 1,
        }
    }
}

/// Lifecycle of a session, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    /// Seat 2 is empty.
    AwaitingPlayer2,
    /// At least one fleet is incomplete.
    Placing,
    /// Both fleets placed; shots are turn-gated.
    Active,
    /// One fleet is fully sunk.
    Finished,
}

/// The most recent shot in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRecord {
    /// Who fired.
    pub seat: Seat,
    /// Where.
    pub position: Position,
    /// What happened.
    pub outcome: ShotOutcome,
}

/// Public summary of a session; reveals no ship positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    /// Session id.
    pub session_id: SessionId,
    /// Seat 1 name.
    pub player1: String,
    /// Seat 2 name, once joined.
    pub player2: Option<String>,
    /// Seat expected to fire next.
    pub current_turn: Seat,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Winner, once finished.
    pub winner: Option<Seat>,
    /// Most recent shot and its outcome.
    pub last_shot: Option<ShotRecord>,
}

/// What one seat is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Whose view this is.
    pub seat: Seat,
    /// Own ships, with hits.
    pub fleet: Vec<ShipView>,
    /// Ship sizes still to place, largest first.
    pub unplaced: Vec<u8>,
    /// Opponent shots at this seat's board.
    pub incoming: Vec<TargetMark>,
    /// This seat's shots at the opponent's board.
    pub outgoing: Vec<TargetMark>,
}

/// A game session: two seats, two boards, and whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    player1: String,
    player2: Option<String>,
    boards: [Board; 2],
    current_turn: Seat,
    last_shot: Option<ShotRecord>,
    winner: Option<Seat>,
}

impl Session {
    /// Creates a session with seat 1 filled and seat 2 open.
    #[instrument(skip(player1), fields(player1 = %player1))]
    pub fn new(id: SessionId, player1: String) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            player1,
            player2: None,
            boards: [Board::new(), Board::new()],
            current_turn: Seat::Player1,
            last_shot: None,
            winner: None,
        }
    }

    /// Reassembles a session from stored parts.
    ///
    /// The winner is recomputed from the boards rather than stored.
    pub(crate) fn from_parts(
        id: SessionId,
        player1: String,
        player2: Option<String>,
        boards: [Board; 2],
        current_turn: Seat,
    ) -> Self {
        let mut session = Self {
            id,
            player1,
            player2,
            boards,
            current_turn,
            last_shot: None,
            winner: None,
        };
        session.settle();
        session
    }

    /// Session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Display name in `seat`, if filled.
    pub fn player_name(&self, seat: Seat) -> Option<&str> {
        match seat {
            Seat::Player1 => Some(&self.player1),
            Seat::Player2 => self.player2.as_deref(),
        }
    }

    /// Seat expected to fire next.
    pub fn current_turn(&self) -> Seat {
        self.current_turn
    }

    /// Winner, once the session is finished.
    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    /// Most recent shot, if any.
    pub fn last_shot(&self) -> Option<ShotRecord> {
        self.last_shot
    }

    /// The board belonging to `seat`.
    pub fn board(&self, seat: Seat) -> &Board {
        &self.boards[seat.index()]
    }

    fn board_mut(&mut self, seat: Seat) -> &mut Board {
        &mut self.boards[seat.index()]
    }

    fn fleets_complete(&self) -> bool {
        self.boards.iter().all(Board::fleet_complete)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        if self.winner.is_some() {
            SessionPhase::Finished
        } else if self.player2.is_none() {
            SessionPhase::AwaitingPlayer2
        } else if self.fleets_complete() {
            SessionPhase::Active
        } else {
            SessionPhase::Placing
        }
    }

    /// Fills seat 2.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyFull`] if seat 2 is taken; the existing name is
    /// kept.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn join(&mut self, player2: String) -> Result<Seat, GameError> {
        if let Some(existing) = &self.player2 {
            warn!(existing = %existing, "Session already has 2 players");
            return Err(GameError::AlreadyFull);
        }
        info!(player2 = %player2, "Registering player as Player2");
        self.player2 = Some(player2);
        Ok(Seat::Player2)
    }

    fn require_seated(&self, seat: Seat) -> Result<(), GameError> {
        if self.player_name(seat).is_none() {
            warn!(%seat, "Seat is empty");
            return Err(GameError::SeatVacant(seat));
        }
        Ok(())
    }

    /// Places one ship on `seat`'s board.
    ///
    /// The ship must still be owed by the standard fleet and pass
    /// `validator`.
    #[instrument(skip(self, validator), fields(session_id = %self.id))]
    pub fn place_ship(
        &mut self,
        seat: Seat,
        shape: ShipShape,
        validator: &PlacementValidator,
    ) -> Result<(), GameError> {
        self.require_seated(seat)?;
        let board = self.board_mut(seat);
        board.remaining().take(shape.size)?;
        board.place(Ship::new(shape), validator).inspect_err(|e| {
            warn!(error = %e, "Placement rejected");
        })?;
        self.log_if_active();
        self.settle();
        Ok(())
    }

    /// Places `seat`'s whole remaining fleet at once, or nothing.
    #[instrument(skip(self, shapes, validator), fields(session_id = %self.id, count = shapes.len()))]
    pub fn place_fleet(
        &mut self,
        seat: Seat,
        shapes: &[ShipShape],
        validator: &PlacementValidator,
    ) -> Result<(), GameError> {
        self.require_seated(seat)?;
        let board = self.board_mut(seat);
        if !board.remaining().matches(shapes.iter().map(|s| s.size)) {
            warn!("Fleet does not match the ships still owed");
            return Err(PlacementError::FleetMismatch.into());
        }
        board
            .place_all(shapes.iter().copied().map(Ship::new).collect(), validator)
            .inspect_err(|e| warn!(error = %e, "Fleet rejected"))?;
        self.log_if_active();
        self.settle();
        Ok(())
    }

    fn log_if_active(&self) {
        if self.phase() == SessionPhase::Active {
            info!(session_id = %self.id, "Both fleets placed; session active");
        }
    }

    /// Finishes an active session whose opponent fleet is gone.
    ///
    /// Ranging shots can sink a fleet before the session is active; the
    /// session then finishes as soon as the last fleet is placed.
    fn settle(&mut self) {
        if self.winner.is_some() || self.phase() != SessionPhase::Active {
            return;
        }
        self.winner = [Seat::Player1, Seat::Player2]
            .into_iter()
            .find(|seat| self.board(seat.opponent()).all_sunk());
        if let Some(winner) = self.winner {
            info!(session_id = %self.id, %winner, "Fleet destroyed; session finished");
        }
    }

    /// Fires from `seat` at the opponent's board.
    ///
    /// Only a miss passes the turn. Once the session is active, firing out of
    /// turn is rejected; before that either seat may fire ranging shots under
    /// the same rules. Sinking the last opponent ship while active finishes
    /// the session.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn shoot(&mut self, seat: Seat, pos: Position) -> Result<ShotOutcome, GameError> {
        if self.winner.is_some() {
            warn!("Shot after game over");
            return Err(GameError::GameOver);
        }
        self.require_seated(Seat::Player2)?;
        if !pos.in_bounds() {
            warn!(%pos, "Shot off the board");
            return Err(GameError::OutOfBounds(pos));
        }
        let active = self.phase() == SessionPhase::Active;
        if active && seat != self.current_turn {
            warn!(expected = %self.current_turn, "Player tried to fire out of turn");
            return Err(GameError::NotYourTurn {
                expected: self.current_turn,
            });
        }

        let outcome = self.board_mut(seat.opponent()).shoot(pos);

        self.last_shot = Some(ShotRecord {
            seat,
            position: pos,
            outcome,
        });
        if outcome.switches_turn() {
            self.current_turn = seat.opponent();
            debug!(next = %self.current_turn, "Turn passes");
        }
        self.settle();

        info!(%outcome, next = %self.current_turn, "Shot completed");
        Ok(outcome)
    }

    /// Public summary.
    pub fn info(&self) -> GameInfo {
        GameInfo {
            session_id: self.id.clone(),
            player1: self.player1.clone(),
            player2: self.player2.clone(),
            current_turn: self.current_turn,
            phase: self.phase(),
            winner: self.winner,
            last_shot: self.last_shot,
        }
    }

    /// Everything `seat` may see: its own fleet in full, the opponent's
    /// board only where `seat` has fired.
    pub fn board_view(&self, seat: Seat) -> BoardView {
        let own = self.board(seat);
        let remaining = own.remaining();
        let unplaced = (1..=crate::fleet::MAX_SHIP_SIZE)
            .rev()
            .flat_map(|size| std::iter::repeat_n(size, remaining.owed(size) as usize))
            .collect();
        BoardView {
            seat,
            fleet: own.fleet_view(),
            unplaced,
            incoming: own.target_view(),
            outgoing: self.board(seat.opponent()).target_view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::Orientation;

    fn joined() -> Session {
        let mut s = Session::new("g".into(), "Alice".into());
        s.join("Bob".into()).unwrap();
        s
    }

    fn one(row: u8, col: u8) -> ShipShape {
        ShipShape::new(1, Orientation::Horizontal, Position::new(row, col))
    }

    #[test]
    fn test_new_session_awaits_player2() {
        let s = Session::new("g".into(), "Alice".into());
        assert_eq!(s.phase(), SessionPhase::AwaitingPlayer2);
        assert_eq!(s.current_turn(), Seat::Player1);
        assert_eq!(s.player_name(Seat::Player2), None);
    }

    #[test]
    fn test_second_join_keeps_first_name() {
        let mut s = joined();
        assert_eq!(s.join("Carol".into()), Err(GameError::AlreadyFull));
        assert_eq!(s.player_name(Seat::Player2), Some("Bob"));
        assert_eq!(s.phase(), SessionPhase::Placing);
    }

    #[test]
    fn test_place_for_empty_seat() {
        let mut s = Session::new("g".into(), "Alice".into());
        let v = PlacementValidator::default();
        assert_eq!(
            s.place_ship(Seat::Player2, one(0, 0), &v),
            Err(GameError::SeatVacant(Seat::Player2))
        );
        assert!(s.place_ship(Seat::Player1, one(0, 0), &v).is_ok());
    }

    #[test]
    fn test_fifth_single_cell_ship_is_over_quota() {
        let mut s = joined();
        let v = PlacementValidator::default();
        for col in [0, 2, 4, 6] {
            s.place_ship(Seat::Player1, one(0, col), &v).unwrap();
        }
        let before = s.clone();
        assert_eq!(
            s.place_ship(Seat::Player1, one(0, 8), &v),
            Err(GameError::InvalidPlacement(PlacementError::FleetExceeded { size: 1 }))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_shot_needs_both_seats() {
        let mut s = Session::new("g".into(), "Alice".into());
        assert_eq!(
            s.shoot(Seat::Player1, Position::new(0, 0)),
            Err(GameError::SeatVacant(Seat::Player2))
        );
    }

    #[test]
    fn test_off_board_shot_rejected() {
        let mut s = joined();
        let before = s.clone();
        assert_eq!(
            s.shoot(Seat::Player1, Position::new(3, 10)),
            Err(GameError::OutOfBounds(Position::new(3, 10)))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_board_view_lists_unplaced_largest_first() {
        let s = joined();
        let view = s.board_view(Seat::Player1);
        assert_eq!(view.unplaced, vec![4, 3, 3, 2, 2, 2, 1, 1, 1, 1]);
        assert!(view.fleet.is_empty());
    }

    #[test]
    fn test_seat_string_form() {
        assert_eq!(Seat::Player2.to_string(), "player2");
        assert_eq!("player1".parse::<Seat>().ok(), Some(Seat::Player1));
    }
}
