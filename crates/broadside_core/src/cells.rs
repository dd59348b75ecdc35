//! Bitmask over the 10×10 grid.
//!
//! One bit per cell in row-major order, packed into a `u128`. Board
//! occupancy, the shot log and per-ship hits are all `CellSet`s, so none of
//! them is ever stored as a second grid that could drift.

use crate::position::{BOARD_SIZE, Position};

const CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

/// A set of on-board positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSet(u128);

impl CellSet {
    /// The empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Adds a position. Returns false if it was already present or is off
    /// the board.
    pub fn insert(&mut self, pos: Position) -> bool {
        match pos.index() {
            Some(i) => {
                let bit = 1u128 << i;
                let fresh = self.0 & bit == 0;
                self.0 |= bit;
                fresh
            }
            None => false,
        }
    }

    /// Membership test; off-board positions are never members.
    pub fn contains(&self, pos: Position) -> bool {
        pos.index().is_some_and(|i| self.0 & (1u128 << i) != 0)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true when no cell is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true when the two sets share a cell.
    pub fn intersects(&self, other: &CellSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true when every member of `self` is in `other`.
    pub fn is_subset(&self, other: &CellSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// This set grown by one cell in all eight directions, clipped to the
    /// board.
    pub fn halo(&self) -> CellSet {
        let mut grown = *self;
        for pos in self.iter() {
            for n in pos.neighbors() {
                grown.insert(n);
            }
        }
        grown
    }

    /// Members in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        (0..CELLS)
            .filter(|i| self.0 & (1u128 << i) != 0)
            .filter_map(Position::from_index)
    }
}

impl std::ops::BitOr for CellSet {
    type Output = CellSet;

    fn bitor(self, rhs: CellSet) -> CellSet {
        CellSet(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for CellSet {
    type Output = CellSet;

    fn bitand(self, rhs: CellSet) -> CellSet {
        CellSet(self.0 & rhs.0)
    }
}

impl FromIterator<Position> for CellSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = CellSet::new();
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}
