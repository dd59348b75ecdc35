//! Placement rules: bounds, overlap, fired-at cells and the no-touching rule.

use crate::board::Board;
use crate::position::Position;
use crate::ship::Ship;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Whether ships may touch each other.
///
/// Chosen once per registry so every session in a process plays by the same
/// rule.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlacementRule {
    /// No cell of a new ship may be 8-adjacent to an existing ship.
    #[default]
    NoTouching,
    /// Contact is allowed; the other checks still apply.
    AllowTouching,
}

/// Why a ship could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PlacementError {
    /// The ship has no cells.
    #[display("Ship must have at least one cell")]
    EmptyShip,

    /// A cell lies off the board.
    #[display("Cell {} is off the board", _0)]
    OutOfBounds(Position),

    /// A cell is already occupied.
    #[display("Cell {} is already occupied", _0)]
    Overlap(Position),

    /// A cell has already been fired at.
    #[display("Cell {} has already been fired at", _0)]
    UnderFire(Position),

    /// A cell touches an existing ship.
    #[display("Cell {} touches another ship", _0)]
    Touching(Position),

    /// The fleet already has every ship of this size.
    #[display("No {}-cell ship left to place", size)]
    FleetExceeded {
        /// Requested size.
        size: u8,
    },

    /// A whole-fleet submission does not match the ships still owed.
    #[display("Submitted ships do not match the remaining fleet")]
    FleetMismatch,
}

impl std::error::Error for PlacementError {}

/// Pure predicate over a board and a candidate ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementValidator {
    rule: PlacementRule,
}

impl PlacementValidator {
    /// Creates a validator enforcing `rule`.
    pub fn new(rule: PlacementRule) -> Self {
        Self { rule }
    }

    /// The rule in force.
    pub fn rule(&self) -> PlacementRule {
        self.rule
    }

    /// Returns true when `ship` may be placed on `board`.
    pub fn can_place(&self, board: &Board, ship: &Ship) -> bool {
        self.check(board, ship).is_ok()
    }

    /// Like [`PlacementValidator::can_place`], reporting the first cell that
    /// breaks a rule.
    #[instrument(skip(self, board, ship), fields(rule = %self.rule, shape = ?ship.shape()))]
    pub fn check(&self, board: &Board, ship: &Ship) -> Result<(), PlacementError> {
        if ship.size() == 0 {
            return Err(PlacementError::EmptyShip);
        }

        if let Some(&pos) = ship.positions().iter().find(|p| !p.in_bounds()) {
            debug!(%pos, "Rejected: off board");
            return Err(PlacementError::OutOfBounds(pos));
        }

        let occupied = board.occupied();
        if let Some(&pos) = ship.positions().iter().find(|p| occupied.contains(**p)) {
            debug!(%pos, "Rejected: overlap");
            return Err(PlacementError::Overlap(pos));
        }

        let shots = board.shots();
        if let Some(&pos) = ship.positions().iter().find(|p| shots.contains(**p)) {
            debug!(%pos, "Rejected: cell already fired at");
            return Err(PlacementError::UnderFire(pos));
        }

        if self.rule == PlacementRule::NoTouching {
            let halo = occupied.halo();
            if let Some(&pos) = ship.positions().iter().find(|p| halo.contains(**p)) {
                debug!(%pos, "Rejected: touching");
                return Err(PlacementError::Touching(pos));
            }
        }

        Ok(())
    }
}
