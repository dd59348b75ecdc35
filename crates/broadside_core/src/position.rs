//! Grid coordinates.

use serde::{Deserialize, Serialize};

/// Width and height of every board.
pub const BOARD_SIZE: u8 = 10;

/// A row/column pair on the grid.
///
/// Positions built from outside input (ship origins, shot targets) may lie
/// off the board; [`Position::in_bounds`] is the single place that decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row, counted from the top.
    pub row: u8,
    /// Column, counted from the left.
    pub col: u8,
}

impl Position {
    /// Creates a position without checking bounds.
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Returns true when both coordinates are in `[0, BOARD_SIZE)`.
    pub fn in_bounds(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Row-major cell index, or `None` when off the board.
    pub fn index(self) -> Option<usize> {
        self.in_bounds()
            .then(|| self.row as usize * BOARD_SIZE as usize + self.col as usize)
    }

    /// Inverse of [`Position::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        let size = BOARD_SIZE as usize;
        (index < size * size).then(|| Self::new((index / size) as u8, (index % size) as u8))
    }

    /// The up to eight on-board cells touching this one, edges and corners.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        let (row, col) = (self.row as i16, self.col as i16);
        (-1i16..=1)
            .flat_map(move |dr| (-1i16..=1).map(move |dc| (dr, dc)))
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .filter_map(move |(dr, dc)| {
                let (r, c) = (row + dr, col + dc);
                let size = BOARD_SIZE as i16;
                ((0..size).contains(&r) && (0..size).contains(&c))
                    .then(|| Position::new(r as u8, c as u8))
            })
    }
}

impl From<(u8, u8)> for Position {
    fn from((row, col): (u8, u8)) -> Self {
        Self::new(row, col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Position::new(0, 0).in_bounds());
        assert!(Position::new(9, 9).in_bounds());
        assert!(!Position::new(10, 0).in_bounds());
        assert!(!Position::new(0, 10).in_bounds());
    }

    #[test]
    fn test_index_round_trip_at_corners() {
        assert_eq!(Position::new(0, 0).index(), Some(0));
        assert_eq!(Position::new(9, 9).index(), Some(99));
        assert_eq!(Position::from_index(42), Some(Position::new(4, 2)));
        assert_eq!(Position::from_index(100), None);
        assert_eq!(Position::new(3, 11).index(), None);
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let n: Vec<_> = Position::new(0, 0).neighbors().collect();
        assert_eq!(n.len(), 3);
        assert!(n.contains(&Position::new(1, 1)));
    }

    #[test]
    fn test_interior_has_eight_neighbors() {
        assert_eq!(Position::new(5, 5).neighbors().count(), 8);
    }
}
