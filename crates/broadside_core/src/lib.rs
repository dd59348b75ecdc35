//! Broadside core - session engine for two-player naval combat
//!
//! Two 10×10 boards, fleets placed under a fixed rule set, and shots fired
//! in turn until one fleet is gone.
//!
//! # Architecture
//!
//! - **Position / CellSet / Ship**: value types for cells and hit state
//! - **Board**: occupancy, owned ships and the shot log
//! - **PlacementValidator**: bounds, overlap and no-touching checks
//! - **Shot resolution**: `Board::shoot` and the four-way [`ShotOutcome`]
//! - **Session**: two seats, two boards and the turn state machine
//! - **SessionRegistry / GameService**: the live sessions and the operations
//!   a transport invokes, written through to a [`SessionStore`]
//!
//! # Example
//!
//! ```
//! use broadside_core::{GameService, MemoryStore, Orientation, PlacementRule, Position, Seat, ShipShape, ShotOutcome};
//!
//! # fn example() -> Result<(), broadside_core::GameError> {
//! let service = GameService::new(MemoryStore::new(), PlacementRule::NoTouching);
//! let (id, _) = service.create_game("Alice".to_string())?;
//! service.join_game(&id, "Bob".to_string())?;
//! service.place_ship(&id, Seat::Player1, ShipShape::new(1, Orientation::Horizontal, Position::new(0, 0)))?;
//! assert_eq!(service.shoot(&id, Seat::Player2, Position::new(0, 0))?, ShotOutcome::Sunk);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod cells;
mod error;
mod fleet;
mod placement;
mod position;
mod record;
mod registry;
mod service;
mod session;
mod ship;
mod shot;
mod store;

pub use board::{Board, ShipView, TargetMark};
pub use cells::CellSet;
pub use error::{GameError, StoreError};
pub use fleet::{FleetQuota, MAX_SHIP_SIZE, STANDARD_FLEET};
pub use placement::{PlacementError, PlacementRule, PlacementValidator};
pub use position::{BOARD_SIZE, Position};
pub use record::{FleetRecord, RECORD_VERSION, SessionRecord, ShotsRecord};
pub use registry::{SessionHandle, SessionRegistry};
pub use service::GameService;
pub use session::{BoardView, GameInfo, Seat, Session, SessionId, SessionPhase, ShotRecord};
pub use ship::{Orientation, Ship, ShipShape};
pub use shot::ShotOutcome;
pub use store::{MemoryStore, SessionStore};
