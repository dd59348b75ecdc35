//! Session store backed by a single SQLite connection.

use broadside_core::{
    FleetRecord, Seat, SessionId, SessionRecord, SessionStore, ShotsRecord, StoreError,
};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, NewSessionRow, SessionRow, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite implementation of [`SessionStore`].
///
/// One connection is shared behind a mutex, so `":memory:"` databases keep
/// their contents for the store's lifetime.
pub struct SqliteStore {
    db_path: String,
    conn: Mutex<SqliteConnection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `db_path` and applies any
    /// pending migrations.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening session store");
        let mut conn = SqliteConnection::establish(&db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", db_path, e)))?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        debug!(count = applied.len(), "Migrations applied");

        Ok(Self {
            db_path,
            conn: Mutex::new(conn),
        })
    }

    /// Path the store was opened with.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn connection(&self) -> MutexGuard<'_, SqliteConnection> {
        self.conn.lock()
    }

    fn ensure_updated(id: &str, rows: usize) -> Result<(), DbError> {
        if rows == 0 {
            warn!(session_id = %id, "Update matched no session");
            return Err(DbError::new(format!("No stored session '{}'", id)));
        }
        Ok(())
    }

    fn now() -> chrono::NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}

impl SessionStore for SqliteStore {
    #[instrument(skip(self))]
    fn add_session(
        &self,
        id: &str,
        player1: &str,
        player2: Option<&str>,
    ) -> Result<(), StoreError> {
        let row = NewSessionRow::opening(id, player1, player2)?;
        diesel::insert_into(schema::sessions::table)
            .values(&row)
            .execute(&mut *self.connection())
            .map_err(DbError::from)?;
        info!(session_id = %id, "Session row inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn update_player2(&self, id: &str, player2: &str) -> Result<(), StoreError> {
        use schema::sessions::dsl;
        let rows = diesel::update(dsl::sessions.find(id))
            .set((dsl::player2.eq(Some(player2)), dsl::updated_at.eq(Self::now())))
            .execute(&mut *self.connection())
            .map_err(DbError::from)?;
        Self::ensure_updated(id, rows)?;
        Ok(())
    }

    #[instrument(skip(self, fleet), fields(ships = fleet.ships.len()))]
    fn update_fleet(&self, id: &str, seat: Seat, fleet: &FleetRecord) -> Result<(), StoreError> {
        use schema::sessions::dsl;
        let json = fleet.encode()?;
        let target = diesel::update(dsl::sessions.find(id));
        let query = match seat {
            Seat::Player1 => target
                .set((dsl::fleet1.eq(json), dsl::updated_at.eq(Self::now())))
                .execute(&mut *self.connection()),
            Seat::Player2 => target
                .set((dsl::fleet2.eq(json), dsl::updated_at.eq(Self::now())))
                .execute(&mut *self.connection()),
        };
        let rows = query.map_err(DbError::from)?;
        Self::ensure_updated(id, rows)?;
        debug!(session_id = %id, %seat, "Fleet stored");
        Ok(())
    }

    #[instrument(skip(self, shots), fields(shots = shots.shots.len()))]
    fn update_shots(&self, id: &str, seat: Seat, shots: &ShotsRecord) -> Result<(), StoreError> {
        use schema::sessions::dsl;
        let json = shots.encode()?;
        let target = diesel::update(dsl::sessions.find(id));
        let query = match seat {
            Seat::Player1 => target
                .set((dsl::shots1.eq(json), dsl::updated_at.eq(Self::now())))
                .execute(&mut *self.connection()),
            Seat::Player2 => target
                .set((dsl::shots2.eq(json), dsl::updated_at.eq(Self::now())))
                .execute(&mut *self.connection()),
        };
        let rows = query.map_err(DbError::from)?;
        Self::ensure_updated(id, rows)?;
        debug!(session_id = %id, %seat, "Shots stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn update_turn(&self, id: &str, seat: Seat) -> Result<(), StoreError> {
        use schema::sessions::dsl;
        let rows = diesel::update(dsl::sessions.find(id))
            .set((
                dsl::current_turn.eq(seat.to_string()),
                dsl::updated_at.eq(Self::now()),
            ))
            .execute(&mut *self.connection())
            .map_err(DbError::from)?;
        Self::ensure_updated(id, rows)?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn get_session(&self, id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let row = schema::sessions::table
            .find(id)
            .select(SessionRow::as_select())
            .first(&mut *self.connection())
            .optional()
            .map_err(DbError::from)?;

        match row {
            Some(row) => Ok(Some(row.into_record()?)),
            None => {
                debug!(session_id = %id, "Session not stored");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let ids = schema::sessions::table
            .select(schema::sessions::id)
            .order((schema::sessions::created_at.asc(), schema::sessions::id.asc()))
            .load::<String>(&mut *self.connection())
            .map_err(DbError::from)?;
        debug!(count = ids.len(), "Stored sessions listed");
        Ok(ids)
    }

    #[instrument(skip(self))]
    fn remove_session(&self, id: &str) -> Result<(), StoreError> {
        let rows = diesel::delete(schema::sessions::table.find(id))
            .execute(&mut *self.connection())
            .map_err(DbError::from)?;
        info!(session_id = %id, rows, "Session row removed");
        Ok(())
    }
}
