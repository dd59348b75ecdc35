//! Ships: shape, cells and hit tracking.

use crate::cells::CellSet;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Direction a ship extends from its origin.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    /// Extends to the right (increasing column).
    Horizontal,
    /// Extends downward (increasing row).
    Vertical,
}

/// A placement request: how long, which way, and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct ShipShape {
    /// Number of cells.
    pub size: u8,
    /// Direction from the origin.
    pub orientation: Orientation,
    /// Top-left cell.
    pub origin: Position,
}

impl ShipShape {
    /// The `size` contiguous cells this shape covers, origin first.
    ///
    /// Cells past the board edge are still produced so that the validator
    /// can report them.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).map(move |i| match self.orientation {
            Orientation::Horizontal => {
                Position::new(self.origin.row, self.origin.col.saturating_add(i))
            }
            Orientation::Vertical => {
                Position::new(self.origin.row.saturating_add(i), self.origin.col)
            }
        })
    }
}

/// A ship with its computed cells and the hits it has taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    shape: ShipShape,
    positions: Vec<Position>,
    mask: CellSet,
    hits: CellSet,
}

impl Ship {
    /// Builds an unhit ship from its shape.
    pub fn new(shape: ShipShape) -> Self {
        let positions: Vec<Position> = shape.cells().collect();
        let mask = positions.iter().copied().collect();
        Self {
            shape,
            positions,
            mask,
            hits: CellSet::new(),
        }
    }

    /// The shape this ship was built from.
    pub fn shape(&self) -> ShipShape {
        self.shape
    }

    /// Number of cells.
    pub fn size(&self) -> usize {
        self.shape.size as usize
    }

    /// Direction from the origin.
    pub fn orientation(&self) -> Orientation {
        self.shape.orientation
    }

    /// Cells in order from the origin.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// On-board cells as a mask.
    pub fn mask(&self) -> CellSet {
        self.mask
    }

    /// Returns true when the ship covers `pos`.
    pub fn occupies(&self, pos: Position) -> bool {
        self.mask.contains(pos)
    }

    /// Cells that have been hit.
    pub fn hits(&self) -> CellSet {
        self.hits
    }

    /// Records a hit at `pos`. Returns false, changing nothing, if the ship
    /// does not cover `pos`.
    pub fn register_hit(&mut self, pos: Position) -> bool {
        if !self.occupies(pos) {
            return false;
        }
        self.hits.insert(pos);
        true
    }

    /// Sunk once every cell has been hit.
    pub fn is_sunk(&self) -> bool {
        self.hits.len() == self.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(size: u8, orientation: Orientation, row: u8, col: u8) -> ShipShape {
        ShipShape::new(size, orientation, Position::new(row, col))
    }

    #[test]
    fn test_horizontal_cells() {
        let ship = Ship::new(shape(3, Orientation::Horizontal, 2, 4));
        assert_eq!(
            ship.positions(),
            &[Position::new(2, 4), Position::new(2, 5), Position::new(2, 6)]
        );
    }

    #[test]
    fn test_vertical_cells() {
        let ship = Ship::new(shape(2, Orientation::Vertical, 8, 0));
        assert_eq!(ship.positions(), &[Position::new(8, 0), Position::new(9, 0)]);
    }

    #[test]
    fn test_off_board_cells_are_kept() {
        let ship = Ship::new(shape(4, Orientation::Horizontal, 0, 8));
        assert_eq!(ship.positions().len(), 4);
        assert_eq!(ship.mask().len(), 2);
    }

    #[test]
    fn test_sinks_after_every_cell_hit() {
        let mut ship = Ship::new(shape(2, Orientation::Horizontal, 0, 0));
        assert!(ship.register_hit(Position::new(0, 0)));
        assert!(!ship.is_sunk());
        assert!(ship.register_hit(Position::new(0, 1)));
        assert!(ship.is_sunk());
    }

    #[test]
    fn test_hit_elsewhere_is_ignored() {
        let mut ship = Ship::new(shape(1, Orientation::Vertical, 5, 5));
        assert!(!ship.register_hit(Position::new(5, 6)));
        assert!(ship.hits().is_empty());
    }

    #[test]
    fn test_orientation_string_form() {
        assert_eq!(Orientation::Vertical.to_string(), "vertical");
        assert_eq!("horizontal".parse::<Orientation>().ok(), Some(Orientation::Horizontal));
    }
}
