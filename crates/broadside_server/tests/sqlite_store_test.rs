//! Tests for the SQLite session store.

use broadside_core::{
    FleetRecord, GameService, Orientation, PlacementRule, Position, Seat, SessionStore, ShipShape,
    ShotOutcome, ShotsRecord,
};
use broadside_server::SqliteStore;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteStore::open(db_path).expect("Failed to open store");
    (db_file, store)
}

#[test]
fn test_add_and_get_session() {
    let (_db, store) = setup_test_db();
    store.add_session("g1", "Alice", None).expect("Insert failed");

    let record = store.get_session("g1").expect("Query failed").expect("Row missing");
    assert_eq!(record.id, "g1");
    assert_eq!(record.player1, "Alice");
    assert_eq!(record.player2, None);
    assert_eq!(record.current_turn, Seat::Player1);
    assert_eq!(record.fleets[0], FleetRecord::default());
    assert_eq!(record.shots[1], ShotsRecord::default());
}

#[test]
fn test_duplicate_id_fails() {
    let (_db, store) = setup_test_db();
    store.add_session("g1", "Alice", None).expect("First insert failed");
    assert!(store.add_session("g1", "Bob", None).is_err());
}

#[test]
fn test_missing_session_is_none() {
    let (_db, store) = setup_test_db();
    assert!(store.get_session("nope").expect("Query failed").is_none());
}

#[test]
fn test_updates_land_in_the_right_columns() {
    let (_db, store) = setup_test_db();
    store.add_session("g1", "Alice", None).expect("Insert failed");

    let fleet = FleetRecord {
        ships: vec![ShipShape::new(3, Orientation::Vertical, Position::new(2, 5))],
        ..FleetRecord::default()
    };
    let shots = ShotsRecord {
        shots: vec![(0, 0), (4, 7)],
        ..ShotsRecord::default()
    };

    store.update_player2("g1", "Bob").expect("update_player2");
    store.update_fleet("g1", Seat::Player2, &fleet).expect("update_fleet");
    store.update_shots("g1", Seat::Player1, &shots).expect("update_shots");
    store.update_turn("g1", Seat::Player2).expect("update_turn");

    let record = store.get_session("g1").expect("Query failed").expect("Row missing");
    assert_eq!(record.player2.as_deref(), Some("Bob"));
    assert_eq!(record.fleets[0], FleetRecord::default());
    assert_eq!(record.fleets[1], fleet);
    assert_eq!(record.shots[0], shots);
    assert_eq!(record.shots[1], ShotsRecord::default());
    assert_eq!(record.current_turn, Seat::Player2);
}

#[test]
fn test_update_missing_session_fails() {
    let (_db, store) = setup_test_db();
    assert!(store.update_player2("ghost", "Bob").is_err());
    assert!(store.update_turn("ghost", Seat::Player2).is_err());
    assert!(store
        .update_fleet("ghost", Seat::Player1, &FleetRecord::default())
        .is_err());
}

#[test]
fn test_list_and_remove() {
    let (_db, store) = setup_test_db();
    for id in ["a", "b", "c"] {
        store.add_session(id, "Alice", None).expect("Insert failed");
    }
    let mut ids = store.list_sessions().expect("List failed");
    ids.sort();
    assert_eq!(ids, vec!["a", "b", "c"]);

    store.remove_session("b").expect("Remove failed");
    store.remove_session("b").expect("Second remove should be a no-op");
    let mut ids = store.list_sessions().expect("List failed");
    ids.sort();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn test_reopen_keeps_rows() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    SqliteStore::open(db_path.clone())
        .expect("Open failed")
        .add_session("g1", "Alice", Some("Bob"))
        .expect("Insert failed");

    let reopened = SqliteStore::open(db_path).expect("Reopen failed");
    let record = reopened.get_session("g1").expect("Query failed").expect("Row missing");
    assert_eq!(record.player2.as_deref(), Some("Bob"));
}

#[test]
fn test_in_memory_store_keeps_schema() {
    let store = SqliteStore::open(":memory:".to_string()).expect("Open failed");
    store.add_session("g1", "Alice", None).expect("Insert failed");
    assert_eq!(store.list_sessions().expect("List failed"), vec!["g1"]);
}

#[test]
fn test_service_survives_restart() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let one = |row, col| ShipShape::new(1, Orientation::Horizontal, Position::new(row, col));

    let id = {
        let store = Arc::new(SqliteStore::open(db_path.clone()).expect("Open failed"));
        let service = GameService::new(store, PlacementRule::NoTouching);
        let (id, _) = service.create_game("Alice".to_string()).expect("create");
        service.join_game(&id, "Bob".to_string()).expect("join");
        service.place_ship(&id, Seat::Player1, one(0, 0)).expect("place");
        service.place_ship(&id, Seat::Player1, one(0, 2)).expect("place");
        assert_eq!(
            service.shoot(&id, Seat::Player2, Position::new(0, 0)).expect("shoot"),
            ShotOutcome::Sunk
        );
        assert_eq!(
            service.shoot(&id, Seat::Player2, Position::new(9, 9)).expect("shoot"),
            ShotOutcome::Miss
        );
        id
    };

    let store = Arc::new(SqliteStore::open(db_path).expect("Reopen failed"));
    let service = GameService::new(store, PlacementRule::NoTouching);
    assert_eq!(service.restore().expect("restore"), 1);

    let info = service.get_game_info(&id).expect("info");
    assert_eq!(info.player2.as_deref(), Some("Bob"));
    assert_eq!(info.current_turn, Seat::Player1);

    let board = service.get_board(&id, Seat::Player1).expect("board");
    assert_eq!(board.fleet.len(), 2);
    assert!(board.fleet[0].sunk);
    assert!(!board.fleet[1].sunk);
    assert_eq!(board.incoming.len(), 2);

    assert_eq!(
        service.shoot(&id, Seat::Player2, Position::new(0, 0)).expect("shoot"),
        ShotOutcome::AlreadyShot
    );
}

#[test]
fn test_restore_skips_unreadable_rows() {
    let (db, store) = setup_test_db();
    store.add_session("good", "Alice", Some("Bob")).expect("Insert failed");
    store.add_session("bad", "Carol", None).expect("Insert failed");

    let db_path = db.path().to_str().expect("Invalid path");
    let mut conn = SqliteConnection::establish(db_path).expect("Failed to connect");
    diesel::sql_query("UPDATE sessions SET fleet1 = 'not json' WHERE id = 'bad'")
        .execute(&mut conn)
        .expect("Corrupting row failed");

    assert!(store.get_session("bad").is_err());

    let service = GameService::new(Arc::new(store), PlacementRule::NoTouching);
    assert_eq!(service.restore().expect("restore"), 1);
    assert_eq!(service.list_games(), vec!["good"]);
}
