//! SQLite persistence for game sessions.

mod error;
mod models;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::DbError;
pub use models::{NewSessionRow, SessionRow};
pub use store::SqliteStore;
