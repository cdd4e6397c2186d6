//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for subtrack using clap's derive
//! macros, plus the command runners that drive the API client.

mod commands;

use clap::{Parser, Subcommand};

use crate::client::SortKey;

pub use commands::run_command;

/// Subtrack - track streamer subscriber counts over time
#[derive(Parser)]
#[command(name = "subtrack")]
#[command(version)]
#[command(about = "Track streamer subscriber counts over time", long_about = None)]
pub struct Cli {
    /// Override the API base URL (default from config: client.api_base_url)
    #[arg(long, short = 'u', global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default when no command is given)
    Serve,

    /// List tracked streamers
    List {
        /// Substring match on name or platform
        #[arg(long)]
        search: Option<String>,

        /// Keep only these platforms (repeatable)
        #[arg(long)]
        platform: Vec<String>,

        /// Minimum current subscriber count
        #[arg(long)]
        min_subs: Option<i64>,

        /// Maximum current subscriber count
        #[arg(long)]
        max_subs: Option<i64>,

        /// Sort key
        #[arg(long, value_enum, default_value_t = SortKey::LastUpdate)]
        sort: SortKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one streamer with derived statistics
    Show {
        /// Streamer id
        id: String,
    },

    /// Add a streamer with an initial subscriber count
    Add {
        /// Display name
        name: String,

        /// Platform (YouTube, Twitch, TikTok, Instagram, Twitter, Facebook, Other)
        #[arg(long)]
        platform: String,

        /// Initial subscriber count
        #[arg(long, default_value_t = 0)]
        subs: i64,
    },

    /// Update a streamer's name or platform
    Update {
        /// Streamer id
        id: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New platform
        #[arg(long)]
        platform: Option<String>,
    },

    /// Remove a streamer and its whole history
    Remove {
        /// Streamer id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Record a new subscriber count at the current time
    Log {
        /// Streamer id
        id: String,

        /// Observed subscriber count
        count: i64,

        /// Record even while the update cooldown has not elapsed
        #[arg(long)]
        force: bool,
    },

    /// Global dashboard: totals, average, top streamer
    Dashboard,

    /// Probe the server's health endpoint
    Health,
}

/// CLI layer errors
#[derive(Debug)]
pub enum CliError {
    CommandError(String),
    Aborted,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::CommandError(msg) => write!(f, "{}", msg),
            CliError::Aborted => write!(f, "Aborted"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<crate::client::ClientError> for CliError {
    fn from(err: crate::client::ClientError) -> Self {
        CliError::CommandError(err.to_string())
    }
}

impl From<crate::errors::SubtrackError> for CliError {
    fn from(err: crate::errors::SubtrackError) -> Self {
        CliError::CommandError(err.format_simple())
    }
}
