//! One player's board: owned ships, occupancy and the shots fired at it.

use crate::cells::CellSet;
use crate::fleet::FleetQuota;
use crate::placement::{PlacementError, PlacementValidator};
use crate::position::Position;
use crate::ship::{Ship, ShipShape};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A 10×10 board.
///
/// Occupancy is the union of the owned ships' cells and is updated only by
/// placement, so it cannot disagree with the ship list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub(crate) occupied: CellSet,
    pub(crate) ships: Vec<Ship>,
    pub(crate) shots: CellSet,
}

impl Board {
    /// An empty board with no ships and no shots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells covered by a ship.
    pub fn occupied(&self) -> CellSet {
        self.occupied
    }

    /// Ships in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Positions already fired at this board.
    pub fn shots(&self) -> CellSet {
        self.shots
    }

    /// Places a ship after checking it with `validator`.
    ///
    /// Not idempotent: placing an identical ship twice is an overlap on the
    /// second call, never a silent no-op.
    #[instrument(skip(self, ship, validator), fields(shape = ?ship.shape()))]
    pub fn place(&mut self, ship: Ship, validator: &PlacementValidator) -> Result<(), PlacementError> {
        validator.check(self, &ship)?;
        self.occupied = self.occupied | ship.mask();
        self.ships.push(ship);
        debug!(ships = self.ships.len(), "Ship placed");
        Ok(())
    }

    /// Places every ship or none of them.
    ///
    /// Each ship is checked against the board as it would stand after the
    /// ones before it.
    #[instrument(skip(self, ships, validator), fields(count = ships.len()))]
    pub fn place_all(
        &mut self,
        ships: Vec<Ship>,
        validator: &PlacementValidator,
    ) -> Result<(), PlacementError> {
        let mut scratch = self.clone();
        for ship in ships {
            scratch.place(ship, validator)?;
        }
        *self = scratch;
        Ok(())
    }

    /// Rebuilds a board from stored ship shapes and shots.
    ///
    /// Hits are not stored; replaying the shots recomputes them.
    pub fn from_parts(
        shapes: &[ShipShape],
        shots: &[Position],
        validator: &PlacementValidator,
    ) -> Result<Self, PlacementError> {
        let mut board = Self::new();
        board.place_all(shapes.iter().copied().map(Ship::new).collect(), validator)?;
        for &pos in shots {
            board.shoot(pos);
        }
        Ok(board)
    }

    /// Ships still owed before this board's fleet is complete.
    pub fn remaining(&self) -> FleetQuota {
        FleetQuota::remaining_for(self)
    }

    /// Returns true once the standard fleet is placed.
    pub fn fleet_complete(&self) -> bool {
        self.remaining().is_complete()
    }

    /// Returns true when there is at least one ship and all are sunk.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }

    /// The owner's view: every ship with its hits.
    pub fn fleet_view(&self) -> Vec<ShipView> {
        self.ships
            .iter()
            .map(|ship| ShipView {
                shape: ship.shape(),
                hits: ship.hits().iter().collect(),
                sunk: ship.is_sunk(),
            })
            .collect()
    }

    /// The opponent's view: where they fired and what they struck, nothing
    /// about unhit ships.
    pub fn target_view(&self) -> Vec<TargetMark> {
        self.shots
            .iter()
            .map(|position| {
                let ship = self.ships.iter().find(|s| s.occupies(position));
                TargetMark {
                    position,
                    hit: ship.is_some(),
                    sunk: ship.is_some_and(Ship::is_sunk),
                }
            })
            .collect()
    }
}

/// A ship as its owner sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipView {
    /// Placement shape.
    pub shape: ShipShape,
    /// Cells hit so far, row-major.
    pub hits: Vec<Position>,
    /// Whether every cell is hit.
    pub sunk: bool,
}

/// A fired-at cell as the shooter sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMark {
    /// Cell fired at.
    pub position: Position,
    /// A ship was there.
    pub hit: bool,
    /// That ship is now sunk.
    pub sunk: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::Orientation;

    fn shape(size: u8, orientation: Orientation, row: u8, col: u8) -> ShipShape {
        ShipShape::new(size, orientation, Position::new(row, col))
    }

    #[test]
    fn test_place_marks_occupancy() {
        let mut board = Board::new();
        board
            .place(Ship::new(shape(3, Orientation::Vertical, 1, 1)), &PlacementValidator::default())
            .unwrap();
        assert_eq!(board.occupied().len(), 3);
        assert!(board.occupied().contains(Position::new(3, 1)));
        assert_eq!(board.ships().len(), 1);
    }

    #[test]
    fn test_same_ship_twice_is_rejected() {
        let mut board = Board::new();
        let v = PlacementValidator::default();
        let ship = Ship::new(shape(2, Orientation::Horizontal, 0, 0));
        board.place(ship.clone(), &v).unwrap();
        assert!(board.place(ship, &v).is_err());
        assert_eq!(board.ships().len(), 1);
    }

    #[test]
    fn test_place_all_is_atomic() {
        let mut board = Board::new();
        let ships = vec![
            Ship::new(shape(2, Orientation::Horizontal, 0, 0)),
            Ship::new(shape(2, Orientation::Horizontal, 5, 5)),
            Ship::new(shape(2, Orientation::Horizontal, 0, 9)),
        ];
        let err = board.place_all(ships, &PlacementValidator::default()).unwrap_err();
        assert_eq!(err, PlacementError::OutOfBounds(Position::new(0, 10)));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_target_view_hides_unhit_ships() {
        let mut board = Board::new();
        board
            .place(Ship::new(shape(2, Orientation::Horizontal, 0, 0)), &PlacementValidator::default())
            .unwrap();
        board.shoot(Position::new(0, 0));
        board.shoot(Position::new(9, 9));
        let view = board.target_view();
        assert_eq!(view.len(), 2);
        assert!(view[0].hit && !view[0].sunk);
        assert!(!view[1].hit);
    }

    #[test]
    fn test_from_parts_recomputes_hits() {
        let shapes = [shape(2, Orientation::Horizontal, 0, 0)];
        let shots = [Position::new(0, 0), Position::new(0, 1), Position::new(4, 4)];
        let board = Board::from_parts(&shapes, &shots, &PlacementValidator::default()).unwrap();
        assert!(board.all_sunk());
        assert_eq!(board.shots().len(), 3);
    }

    #[test]
    fn test_empty_board_is_not_all_sunk() {
        assert!(!Board::new().all_sunk());
    }
}
