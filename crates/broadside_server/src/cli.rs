//! Command-line interface for the broadside server.

use broadside_core::PlacementRule;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Broadside - two-player naval combat over HTTP
#[derive(Parser, Debug)]
#[command(name = "broadside")]
#[command(about = "Game session server for two-player naval combat", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true, env = "BROADSIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the database file (created if it doesn't exist)
    #[arg(long, global = true, env = "BROADSIDE_DB")]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long, env = "BROADSIDE_PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "BROADSIDE_HOST")]
        host: Option<String>,

        /// Placement rule: no_touching or allow_touching
        #[arg(long, env = "BROADSIDE_PLACEMENT_RULE")]
        placement_rule: Option<PlacementRule>,
    },

    /// List stored sessions
    Sessions,

    /// Delete a stored session
    Remove {
        /// Session id
        id: String,
    },
}
