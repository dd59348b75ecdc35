//! Directory of live sessions.

use crate::error::GameError;
use crate::session::{Session, SessionId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Shared handle to one session. Lock it for the whole of any
/// read-modify-write so two calls on the same session cannot interleave.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Maps session ids to sessions.
///
/// The map lock is held only for lookup, insert and remove; work on a
/// session happens under that session's own lock, so sessions never
/// contend with each other.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session registry");
        Self::default()
    }

    /// A fresh random (v4 UUID) session id.
    pub fn generate_id() -> SessionId {
        uuid::Uuid::new_v4().to_string()
    }

    /// Creates and registers a session for `player1` under a fresh id.
    #[instrument(skip(self))]
    pub fn create(&self, player1: String) -> Result<SessionHandle, GameError> {
        self.insert(Session::new(Self::generate_id(), player1))
    }

    /// Registers an already built session.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyExists`] if the id is taken.
    #[instrument(skip(self, session), fields(session_id = %session.id()))]
    pub fn insert(&self, session: Session) -> Result<SessionHandle, GameError> {
        let mut sessions = self.sessions.write();
        let id = session.id().clone();
        if sessions.contains_key(&id) {
            warn!("Session already exists");
            return Err(GameError::AlreadyExists(id));
        }
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(id, Arc::clone(&handle));
        debug!(count = sessions.len(), "Session registered");
        Ok(handle)
    }

    /// Looks up a session.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<SessionHandle, GameError> {
        self.sessions.read().get(id).cloned().ok_or_else(|| {
            debug!("Session not found");
            GameError::NotFound(id.to_string())
        })
    }

    /// All session ids, sorted.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    /// Unregisters a session and returns its handle.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) -> Result<SessionHandle, GameError> {
        let removed = self.sessions.write().remove(id);
        match removed {
            Some(handle) => {
                info!("Session removed");
                Ok(handle)
            }
            None => Err(GameError::NotFound(id.to_string())),
        }
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Returns true when no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every session.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        let mut sessions = self.sessions.write();
        info!(count = sessions.len(), "Clearing session registry");
        sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_get_remove() {
        let registry = SessionRegistry::new();
        let handle = registry.create("Alice".into()).unwrap();
        let id = handle.lock().id().clone();
        assert!(registry.get(&id).is_ok());
        assert_eq!(registry.list(), vec![id.clone()]);
        registry.remove(&id).unwrap();
        assert_eq!(registry.get(&id).unwrap_err(), GameError::NotFound(id.clone()));
        assert_eq!(registry.remove(&id).unwrap_err(), GameError::NotFound(id));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = SessionRegistry::new();
        registry.insert(Session::new("dup".into(), "A".into())).unwrap();
        let err = registry
            .insert(Session::new("dup".into(), "B".into()))
            .unwrap_err();
        assert_eq!(err, GameError::AlreadyExists("dup".into()));
        assert_eq!(registry.get("dup").unwrap().lock().player_name(crate::Seat::Player1), Some("A"));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: std::collections::HashSet<_> =
            (0..1000).map(|_| SessionRegistry::generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_clear() {
        let registry = SessionRegistry::new();
        registry.create("A".into()).unwrap();
        registry.create("B".into()).unwrap();
        assert_eq!(registry.len(), 2);
        registry.clear();
        assert!(registry.is_empty());
    }
}
