//! Broadside - server and maintenance CLI

#![warn(missing_docs)]

mod cli;

use anyhow::{Result, bail};
use broadside_core::{GameService, SessionStore};
use broadside_server::{AppState, ServerConfig, SqliteStore, router};
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config =
        ServerConfig::load(cli.config.as_deref())?.with_overrides(None, None, cli.db_path, None);

    match cli.command {
        Command::Serve {
            port,
            host,
            placement_rule,
        } => serve(config.with_overrides(host, port, None, placement_rule)).await,
        Command::Sessions => list_sessions(&config),
        Command::Remove { id } => remove_session(&config, &id),
    }
}

/// Run the HTTP game server
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
async fn serve(config: ServerConfig) -> Result<()> {
    let store: Arc<dyn SessionStore> = Arc::new(SqliteStore::open(config.db_path().clone())?);
    let service = GameService::new(store, *config.placement_rule());
    let restored = service.restore()?;
    info!(restored, rule = %config.placement_rule(), "Sessions loaded");

    let app = router(AppState::new(Arc::new(service)));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("✅ Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app).await?;
    Ok(())
}

/// Print every stored session
#[instrument(skip_all)]
fn list_sessions(config: &ServerConfig) -> Result<()> {
    let store = SqliteStore::open(config.db_path().clone())?;
    let ids = store.list_sessions()?;
    if ids.is_empty() {
        println!("No stored sessions");
        return Ok(());
    }
    for id in ids {
        if let Some(record) = store.get_session(&id)? {
            println!(
                "{}  {} vs {}  (turn: {})",
                record.id,
                record.player1,
                record.player2.as_deref().unwrap_or("-"),
                record.current_turn,
            );
        }
    }
    Ok(())
}

/// Delete one stored session
#[instrument(skip(config))]
fn remove_session(config: &ServerConfig, id: &str) -> Result<()> {
    let store = SqliteStore::open(config.db_path().clone())?;
    if store.get_session(id)?.is_none() {
        bail!("No stored session '{}'", id);
    }
    store.remove_session(id)?;
    info!(session_id = %id, "Session removed");
    println!("Removed {}", id);
    Ok(())
}
