//! Standard fleet composition and the per-board quota of ships still owed.

use crate::board::Board;
use crate::placement::PlacementError;

/// Longest ship in the standard fleet.
pub const MAX_SHIP_SIZE: u8 = 4;

/// Ship sizes every player must place: one 4, two 3s, three 2s, four 1s.
pub const STANDARD_FLEET: [u8; 10] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];

/// Count of ships still owed, per size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetQuota {
    owed: [u8; MAX_SHIP_SIZE as usize + 1],
}

impl FleetQuota {
    /// The full standard fleet, nothing placed yet.
    pub fn standard() -> Self {
        let mut owed = [0; MAX_SHIP_SIZE as usize + 1];
        for size in STANDARD_FLEET {
            owed[size as usize] += 1;
        }
        Self { owed }
    }

    /// What `board` still needs to complete the standard fleet.
    pub fn remaining_for(board: &Board) -> Self {
        let mut quota = Self::standard();
        for ship in board.ships() {
            if let Some(slot) = quota.owed.get_mut(ship.size()) {
                *slot = slot.saturating_sub(1);
            }
        }
        quota
    }

    /// Ships of `size` still owed.
    pub fn owed(&self, size: u8) -> u8 {
        self.owed.get(size as usize).copied().unwrap_or(0)
    }

    /// Total ships still owed.
    pub fn total(&self) -> usize {
        self.owed.iter().map(|&n| n as usize).sum()
    }

    /// Returns true when nothing is owed.
    pub fn is_complete(&self) -> bool {
        self.total() == 0
    }

    /// Claims one ship of `size` from the quota.
    pub fn take(&mut self, size: u8) -> Result<(), PlacementError> {
        match self.owed.get_mut(size as usize) {
            Some(slot) if *slot > 0 => {
                *slot -= 1;
                Ok(())
            }
            _ => Err(PlacementError::FleetExceeded { size }),
        }
    }

    /// Returns true when `sizes` is exactly the multiset still owed.
    pub fn matches(&self, sizes: impl IntoIterator<Item = u8>) -> bool {
        let mut left = *self;
        for size in sizes {
            if left.take(size).is_err() {
                return false;
            }
        }
        left.is_complete()
    }
}

impl Default for FleetQuota {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_totals() {
        let q = FleetQuota::standard();
        assert_eq!(q.total(), 10);
        assert_eq!(q.owed(4), 1);
        assert_eq!(q.owed(3), 2);
        assert_eq!(q.owed(2), 3);
        assert_eq!(q.owed(1), 4);
        assert_eq!(q.owed(5), 0);
    }

    #[test]
    fn test_take_until_exhausted() {
        let mut q = FleetQuota::standard();
        assert!(q.take(4).is_ok());
        assert_eq!(q.take(4), Err(PlacementError::FleetExceeded { size: 4 }));
        assert_eq!(q.take(7), Err(PlacementError::FleetExceeded { size: 7 }));
    }

    #[test]
    fn test_matches_requires_exact_multiset() {
        let q = FleetQuota::standard();
        assert!(q.matches(STANDARD_FLEET));
        assert!(!q.matches([4, 3, 3, 2, 2, 2, 1, 1, 1]));
        assert!(!q.matches([4, 4, 3, 2, 2, 2, 1, 1, 1, 1]));
    }
}
