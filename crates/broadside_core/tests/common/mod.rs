//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use broadside_core::{
    FleetRecord, MemoryStore, Orientation, Position, Seat, SessionId, SessionRecord, SessionStore,
    ShipShape, ShotsRecord, StoreError,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// A standard fleet laid out with a gap around every ship.
pub fn spaced_fleet() -> Vec<ShipShape> {
    let h = |size, row, col| ShipShape::new(size, Orientation::Horizontal, Position::new(row, col));
    vec![
        h(4, 0, 0),
        h(3, 2, 0),
        h(3, 2, 4),
        h(2, 4, 0),
        h(2, 4, 3),
        h(2, 4, 6),
        h(1, 6, 0),
        h(1, 6, 2),
        h(1, 6, 4),
        h(1, 6, 6),
    ]
}

/// Every cell covered by [`spaced_fleet`].
pub fn spaced_fleet_cells() -> Vec<Position> {
    spaced_fleet().iter().flat_map(|s| s.cells().collect::<Vec<_>>()).collect()
}

/// Single-cell ship at `(row, col)`.
pub fn single(row: u8, col: u8) -> ShipShape {
    ShipShape::new(1, Orientation::Horizontal, Position::new(row, col))
}

/// A store whose writes can be switched off.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    down: AtomicBool,
}

impl FlakyStore {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            Err(StoreError::new("store unavailable"))
        } else {
            Ok(())
        }
    }
}

impl SessionStore for FlakyStore {
    fn add_session(&self, id: &str, player1: &str, player2: Option<&str>) -> Result<(), StoreError> {
        self.check()?;
        self.inner.add_session(id, player1, player2)
    }

    fn update_player2(&self, id: &str, player2: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update_player2(id, player2)
    }

    fn update_fleet(&self, id: &str, seat: Seat, fleet: &FleetRecord) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update_fleet(id, seat, fleet)
    }

    fn update_shots(&self, id: &str, seat: Seat, shots: &ShotsRecord) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update_shots(id, seat, shots)
    }

    fn update_turn(&self, id: &str, seat: Seat) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update_turn(id, seat)
    }

    fn get_session(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        self.inner.get_session(id)
    }

    fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        self.inner.list_sessions()
    }

    fn remove_session(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.remove_session(id)
    }
}
