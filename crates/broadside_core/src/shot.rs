//! Shot resolution against a board.

use crate::board::Board;
use crate::position::Position;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Every possible result of firing at a cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShotOutcome {
    /// The cell was fired at before; nothing changed.
    AlreadyShot,
    /// Struck a ship and that was its last unhit cell.
    Sunk,
    /// Struck a ship that is still afloat.
    Hit,
    /// Open water.
    Miss,
}

impl ShotOutcome {
    /// Only a miss hands the turn to the other player.
    pub fn switches_turn(self) -> bool {
        matches!(self, ShotOutcome::Miss)
    }

    /// Hit or sunk.
    pub fn struck(self) -> bool {
        matches!(self, ShotOutcome::Hit | ShotOutcome::Sunk)
    }
}

impl Board {
    /// Fires at `pos` on this board.
    ///
    /// A repeat shot returns [`ShotOutcome::AlreadyShot`] and leaves the shot
    /// log and every ship's hits untouched. Off-board targets resolve to a
    /// miss and are not logged; sessions reject them before they get here.
    #[instrument(skip(self), fields(%pos))]
    pub fn shoot(&mut self, pos: Position) -> ShotOutcome {
        if self.shots.contains(pos) {
            debug!("Repeat shot");
            return ShotOutcome::AlreadyShot;
        }
        self.shots.insert(pos);

        // Ships never overlap, so at most one can match.
        let outcome = match self.ships.iter_mut().find(|s| s.occupies(pos)) {
            Some(ship) => {
                ship.register_hit(pos);
                if ship.is_sunk() {
                    ShotOutcome::Sunk
                } else {
                    ShotOutcome::Hit
                }
            }
            None => ShotOutcome::Miss,
        };
        debug!(%outcome, "Shot resolved");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementValidator;
    use crate::ship::{Orientation, Ship, ShipShape};

    fn board_with_destroyer() -> Board {
        let mut board = Board::new();
        board
            .place(
                Ship::new(ShipShape::new(2, Orientation::Vertical, Position::new(3, 3))),
                &PlacementValidator::default(),
            )
            .unwrap();
        board
    }

    #[test]
    fn test_miss_hit_sunk() {
        let mut board = board_with_destroyer();
        assert_eq!(board.shoot(Position::new(0, 0)), ShotOutcome::Miss);
        assert_eq!(board.shoot(Position::new(3, 3)), ShotOutcome::Hit);
        assert_eq!(board.shoot(Position::new(4, 3)), ShotOutcome::Sunk);
        assert!(board.all_sunk());
    }

    #[test]
    fn test_repeat_shot_changes_nothing() {
        let mut board = board_with_destroyer();
        assert_eq!(board.shoot(Position::new(3, 3)), ShotOutcome::Hit);
        let after_first = board.clone();
        assert_eq!(board.shoot(Position::new(3, 3)), ShotOutcome::AlreadyShot);
        assert_eq!(board, after_first);
    }

    #[test]
    fn test_repeat_miss_is_already_shot() {
        let mut board = board_with_destroyer();
        board.shoot(Position::new(9, 9));
        assert_eq!(board.shoot(Position::new(9, 9)), ShotOutcome::AlreadyShot);
    }

    #[test]
    fn test_off_board_is_unlogged_miss() {
        let mut board = board_with_destroyer();
        assert_eq!(board.shoot(Position::new(12, 0)), ShotOutcome::Miss);
        assert!(board.shots().is_empty());
    }

    #[test]
    fn test_only_miss_switches_turn() {
        assert!(ShotOutcome::Miss.switches_turn());
        assert!(!ShotOutcome::Hit.switches_turn());
        assert!(!ShotOutcome::Sunk.switches_turn());
        assert!(!ShotOutcome::AlreadyShot.switches_turn());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(ShotOutcome::AlreadyShot.to_string(), "already_shot");
        assert_eq!(
            serde_json::to_string(&ShotOutcome::Sunk).unwrap(),
            "\"sunk\""
        );
    }
}
