//! Broadside server - persistence, configuration and HTTP routes
//!
//! Wraps a [`broadside_core::GameService`] with a SQLite-backed
//! [`SqliteStore`] and serves it over JSON.
//!
//! # Example
//!
//! ```no_run
//! use broadside_core::{GameService, SessionStore};
//! use broadside_server::{AppState, ServerConfig, SqliteStore, router};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let store: Arc<dyn SessionStore> = Arc::new(SqliteStore::open(config.db_path().clone())?);
//! let service = GameService::new(store, *config.placement_rule());
//! service.restore()?;
//!
//! let app = router(AppState::new(Arc::new(service)));
//! let listener = tokio::net::TcpListener::bind(("127.0.0.1", *config.port())).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use db::{DbError, NewSessionRow, SessionRow, SqliteStore};
pub use server::{
    ApiError, AppState, CreatedResponse, GamesResponse, JoinedResponse, PlaceFleetRequest,
    PlaceShipRequest, PlayerRequest, SharedService, ShotRequest, ShotResponse, router,
};
