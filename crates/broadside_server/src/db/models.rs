//! Database models for stored sessions.

use broadside_core::{FleetRecord, Seat, SessionRecord, ShotsRecord};
use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};

/// One row of the `sessions` table.
///
/// Fleet and shot columns hold versioned JSON records; the turn column holds
/// the seat name.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::sessions)]
pub struct SessionRow {
    id: String,
    player1: String,
    player2: Option<String>,
    fleet1: String,
    fleet2: String,
    shots1: String,
    shots2: String,
    current_turn: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl SessionRow {
    /// Decodes the row into the engine's record type.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a column holds an unreadable record or seat.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn into_record(self) -> Result<SessionRecord, DbError> {
        let current_turn = self
            .current_turn
            .parse::<Seat>()
            .map_err(|e| DbError::new(format!("Bad turn '{}': {}", self.current_turn, e)))?;
        Ok(SessionRecord {
            fleets: [
                FleetRecord::decode(&self.fleet1)?,
                FleetRecord::decode(&self.fleet2)?,
            ],
            shots: [
                ShotsRecord::decode(&self.shots1)?,
                ShotsRecord::decode(&self.shots2)?,
            ],
            id: self.id,
            player1: self.player1,
            player2: self.player2,
            current_turn,
        })
    }
}

/// Insertable row for a freshly created session.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::sessions)]
pub struct NewSessionRow {
    id: String,
    player1: String,
    player2: Option<String>,
    fleet1: String,
    fleet2: String,
    shots1: String,
    shots2: String,
    current_turn: String,
}

impl NewSessionRow {
    /// A row with empty fleets, no shots and seat 1 to move.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the empty records fail to encode.
    #[instrument(skip(player1, player2))]
    pub fn opening(id: &str, player1: &str, player2: Option<&str>) -> Result<Self, DbError> {
        let fleet = FleetRecord::default().encode()?;
        let shots = ShotsRecord::default().encode()?;
        Ok(Self::new(
            id.to_string(),
            player1.to_string(),
            player2.map(str::to_string),
            fleet.clone(),
            fleet,
            shots.clone(),
            shots,
            Seat::Player1.to_string(),
        ))
    }
}
