//! The persistence collaborator interface and an in-memory implementation.

use crate::error::StoreError;
use crate::record::{FleetRecord, SessionRecord, ShotsRecord};
use crate::session::{Seat, SessionId};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Durable row store keyed by session id, with per-seat fleet and shot
/// columns.
///
/// Only point lookups and full listing are needed. Writes are last-write-wins.
pub trait SessionStore: Send + Sync {
    /// Inserts a new row.
    fn add_session(
        &self,
        id: &str,
        player1: &str,
        player2: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Sets seat 2's name.
    fn update_player2(&self, id: &str, player2: &str) -> Result<(), StoreError>;

    /// Replaces one seat's fleet.
    fn update_fleet(&self, id: &str, seat: Seat, fleet: &FleetRecord) -> Result<(), StoreError>;

    /// Replaces the shots fired at one seat's board.
    fn update_shots(&self, id: &str, seat: Seat, shots: &ShotsRecord) -> Result<(), StoreError>;

    /// Records whose turn it is.
    fn update_turn(&self, id: &str, seat: Seat) -> Result<(), StoreError>;

    /// Fetches one row.
    fn get_session(&self, id: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// Every stored id.
    fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError>;

    /// Deletes a row. Deleting a missing row is not an error.
    fn remove_session(&self, id: &str) -> Result<(), StoreError>;
}

/// Keeps rows in a map; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_row<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut SessionRecord) -> T,
    ) -> Result<T, StoreError> {
        let mut rows = self.rows.lock();
        let row = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::new(format!("No stored session '{}'", id)))?;
        Ok(f(row))
    }
}

impl SessionStore for MemoryStore {
    #[instrument(skip(self))]
    fn add_session(
        &self,
        id: &str,
        player1: &str,
        player2: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock();
        if rows.contains_key(id) {
            return Err(StoreError::new(format!("Stored session '{}' already exists", id)));
        }
        rows.insert(
            id.to_string(),
            SessionRecord {
                id: id.to_string(),
                player1: player1.to_string(),
                player2: player2.map(str::to_string),
                fleets: Default::default(),
                shots: Default::default(),
                current_turn: Seat::Player1,
            },
        );
        debug!("Row added");
        Ok(())
    }

    #[instrument(skip(self))]
    fn update_player2(&self, id: &str, player2: &str) -> Result<(), StoreError> {
        self.with_row(id, |row| row.player2 = Some(player2.to_string()))
    }

    #[instrument(skip(self, fleet))]
    fn update_fleet(&self, id: &str, seat: Seat, fleet: &FleetRecord) -> Result<(), StoreError> {
        self.with_row(id, |row| row.fleets[seat.index()] = fleet.clone())
    }

    #[instrument(skip(self, shots))]
    fn update_shots(&self, id: &str, seat: Seat, shots: &ShotsRecord) -> Result<(), StoreError> {
        self.with_row(id, |row| row.shots[seat.index()] = shots.clone())
    }

    #[instrument(skip(self))]
    fn update_turn(&self, id: &str, seat: Seat) -> Result<(), StoreError> {
        self.with_row(id, |row| row.current_turn = seat)
    }

    #[instrument(skip(self))]
    fn get_session(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.rows.lock().get(id).cloned())
    }

    #[instrument(skip(self))]
    fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        Ok(self.rows.lock().keys().cloned().collect())
    }

    #[instrument(skip(self))]
    fn remove_session(&self, id: &str) -> Result<(), StoreError> {
        self.rows.lock().remove(id);
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn add_session(&self, id: &str, player1: &str, player2: Option<&str>) -> Result<(), StoreError> {
        (**self).add_session(id, player1, player2)
    }

    fn update_player2(&self, id: &str, player2: &str) -> Result<(), StoreError> {
        (**self).update_player2(id, player2)
    }

    fn update_fleet(&self, id: &str, seat: Seat, fleet: &FleetRecord) -> Result<(), StoreError> {
        (**self).update_fleet(id, seat, fleet)
    }

    fn update_shots(&self, id: &str, seat: Seat, shots: &ShotsRecord) -> Result<(), StoreError> {
        (**self).update_shots(id, seat, shots)
    }

    fn update_turn(&self, id: &str, seat: Seat) -> Result<(), StoreError> {
        (**self).update_turn(id, seat)
    }

    fn get_session(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        (**self).get_session(id)
    }

    fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        (**self).list_sessions()
    }

    fn remove_session(&self, id: &str) -> Result<(), StoreError> {
        (**self).remove_session(id)
    }
}
