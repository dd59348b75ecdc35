//! Game operations over a registry, with write-through to a store.

use crate::board::Board;
use crate::error::GameError;
use crate::placement::{PlacementRule, PlacementValidator};
use crate::position::Position;
use crate::record::{FleetRecord, ShotsRecord};
use crate::registry::SessionRegistry;
use crate::session::{BoardView, GameInfo, Seat, Session, SessionId};
use crate::ship::ShipShape;
use crate::shot::ShotOutcome;
use crate::store::SessionStore;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Entry point for every operation a transport can invoke.
///
/// Mutations run against a copy of the session under its lock; the copy
/// replaces the live session only after the store has accepted the change.
/// A store failure therefore fails the call and leaves memory untouched.
#[derive(Debug)]
pub struct GameService<S> {
    registry: SessionRegistry,
    store: S,
    validator: PlacementValidator,
}

impl<S: SessionStore> GameService<S> {
    /// Creates a service with an empty registry.
    #[instrument(skip(store))]
    pub fn new(store: S, rule: PlacementRule) -> Self {
        info!(%rule, "Creating game service");
        Self {
            registry: SessionRegistry::new(),
            store,
            validator: PlacementValidator::new(rule),
        }
    }

    /// The live sessions.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The placement rule every session in this service follows.
    pub fn rule(&self) -> PlacementRule {
        self.validator.rule()
    }

    /// Loads every stored session into the registry. Returns how many were
    /// loaded.
    ///
    /// Stored fleets passed placement when they were made, so they are
    /// replayed without the contact rule and survive a change of rule.
    /// Rows that can't be read or rebuilt are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`GameError::Store`] if the stored ids can't be listed.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Result<usize, GameError> {
        let replay = PlacementValidator::new(PlacementRule::AllowTouching);
        let mut loaded = 0;
        let mut skipped = 0;
        for id in self.store.list_sessions()? {
            let record = match self.store.get_session(&id) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    warn!(session_id = %id, "Listed session vanished before load");
                    continue;
                }
                Err(e) => {
                    warn!(session_id = %id, error = %e, "Skipping unreadable session");
                    skipped += 1;
                    continue;
                }
            };
            let restored = record
                .into_session(&replay)
                .map_err(GameError::from)
                .and_then(|session| self.registry.insert(session));
            match restored {
                Ok(_) => loaded += 1,
                Err(e) => {
                    warn!(session_id = %id, error = %e, "Skipping session that failed to restore");
                    skipped += 1;
                }
            }
        }
        info!(loaded, skipped, "Sessions restored from store");
        Ok(loaded)
    }

    /// Opens a session with `player1` in seat 1.
    #[instrument(skip(self))]
    pub fn create_game(&self, player1: String) -> Result<(SessionId, Seat), GameError> {
        let id = SessionRegistry::generate_id();
        self.store.add_session(&id, &player1, None)?;
        self.registry.insert(Session::new(id.clone(), player1))?;
        info!(session_id = %id, "Game created");
        Ok((id, Seat::Player1))
    }

    /// Seats `player2` in an open session.
    #[instrument(skip(self))]
    pub fn join_game(&self, id: &str, player2: String) -> Result<Seat, GameError> {
        self.mutate(id, |session| session.join(player2))
    }

    /// Ids of every session.
    pub fn list_games(&self) -> Vec<SessionId> {
        self.registry.list()
    }

    /// Places one ship for `seat`.
    #[instrument(skip(self))]
    pub fn place_ship(&self, id: &str, seat: Seat, shape: ShipShape) -> Result<(), GameError> {
        let validator = self.validator;
        self.mutate(id, |session| session.place_ship(seat, shape, &validator))
    }

    /// Places `seat`'s whole remaining fleet atomically.
    #[instrument(skip(self, shapes), fields(count = shapes.len()))]
    pub fn place_fleet(&self, id: &str, seat: Seat, shapes: &[ShipShape]) -> Result<(), GameError> {
        let validator = self.validator;
        self.mutate(id, |session| session.place_fleet(seat, shapes, &validator))
    }

    /// Fires from `seat` at `pos` on the opponent's board.
    #[instrument(skip(self))]
    pub fn shoot(&self, id: &str, seat: Seat, pos: Position) -> Result<ShotOutcome, GameError> {
        self.mutate(id, |session| session.shoot(seat, pos))
    }

    /// Names, turn, phase and last shot.
    #[instrument(skip(self))]
    pub fn get_game_info(&self, id: &str) -> Result<GameInfo, GameError> {
        Ok(self.registry.get(id)?.lock().info())
    }

    /// What `seat` may see of both boards.
    #[instrument(skip(self))]
    pub fn get_board(&self, id: &str, seat: Seat) -> Result<BoardView, GameError> {
        Ok(self.registry.get(id)?.lock().board_view(seat))
    }

    /// Deletes a session from the store and the registry.
    #[instrument(skip(self))]
    pub fn remove_game(&self, id: &str) -> Result<(), GameError> {
        let handle = self.registry.get(id)?;
        let _guard = handle.lock();
        self.store.remove_session(id)?;
        self.registry.remove(id)?;
        info!(session_id = %id, "Game removed");
        Ok(())
    }

    fn mutate<T>(
        &self,
        id: &str,
        op: impl FnOnce(&mut Session) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let handle = self.registry.get(id)?;
        let mut live = handle.lock();
        let mut draft = live.clone();
        let out = op(&mut draft)?;
        self.write_through(&live, &draft).inspect_err(|e| {
            warn!(session_id = %id, error = %e, "Store rejected change; session left as it was");
        })?;
        *live = draft;
        Ok(out)
    }

    fn write_through(&self, before: &Session, after: &Session) -> Result<(), GameError> {
        let id = after.id();
        if before.player_name(Seat::Player2) != after.player_name(Seat::Player2) {
            if let Some(name) = after.player_name(Seat::Player2) {
                self.store.update_player2(id, name)?;
            }
        }
        for seat in Seat::iter() {
            let (old, new): (&Board, &Board) = (before.board(seat), after.board(seat));
            if old.ships().len() != new.ships().len() {
                self.store.update_fleet(id, seat, &FleetRecord::of(new))?;
            }
            if old.shots() != new.shots() {
                self.store.update_shots(id, seat, &ShotsRecord::of(new))?;
            }
        }
        if before.current_turn() != after.current_turn() {
            self.store.update_turn(id, after.current_turn())?;
        }
        debug!(session_id = %id, "Change written through");
        Ok(())
    }
}
