//! Command-line interface definition for Clubnet
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for server selection, authentication, and browsing
//! clubs, universities, and events.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clubnet - university clubs from the terminal
///
/// Sign in to a clubs backend and browse universities, clubs, and events.
#[derive(Parser, Debug, Clone)]
#[command(name = "clubnet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory for the persisted session and server records
    #[arg(long, env = "CLUBNET_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Clubnet
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show or change the backend server
    Server {
        #[command(subcommand)]
        command: ServerCommand,
    },

    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(short, long, env = "CLUBNET_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Send the request to this server instead of the configured one
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Create an account
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(short, long, env = "CLUBNET_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Subscription plan
        #[arg(long)]
        plan: Option<String>,

        /// Requested role
        #[arg(long)]
        role: Option<String>,

        /// Send the request to this server instead of the configured one
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Send the email verification link again
    ResendVerification {
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        api_url: Option<String>,
    },

    /// Browse clubs
    Clubs {
        #[command(subcommand)]
        command: ClubCommand,
    },

    /// Browse universities
    Universities {
        #[command(subcommand)]
        command: UniversityCommand,
    },

    /// Browse and RSVP to events
    Events {
        #[command(subcommand)]
        command: EventCommand,
    },

    /// Send an authenticated request to any backend path
    Request {
        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Path relative to the server URL, e.g. /clubs
        path: String,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },
}

/// Server selection subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ServerCommand {
    /// Show the current server
    Show,

    /// Use a different server
    Set {
        /// Server base URL, e.g. https://clubs.example.edu
        url: String,
    },

    /// Go back to the default server
    Reset,
}

/// Club subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ClubCommand {
    /// List clubs
    List {
        /// Only clubs you belong to
        #[arg(long, conflicts_with_all = ["popular", "recommended"])]
        mine: bool,

        /// Most active clubs
        #[arg(long, conflicts_with = "recommended")]
        popular: bool,

        /// Clubs suggested for you
        #[arg(long)]
        recommended: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Search clubs by name
    Search {
        query: String,

        #[arg(short, long)]
        json: bool,
    },

    /// Show one club
    Show { id: String },

    /// List the members of a club
    Members {
        id: String,

        #[arg(short, long)]
        json: bool,
    },

    /// Join a club
    Join { id: String },

    /// Leave a club
    Leave { id: String },

    /// List the verticals of a club
    Verticals { id: String },

    /// Show one vertical
    Vertical { id: String },
}

/// University subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum UniversityCommand {
    /// List universities
    List {
        #[arg(short, long)]
        json: bool,
    },

    /// Show one university
    Show { id: String },
}

/// Event subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum EventCommand {
    /// List the events of a club
    List {
        club_id: String,

        #[arg(short, long)]
        json: bool,
    },

    /// Show one event
    Show { id: String },

    /// RSVP to an event
    Register { id: String },

    /// Cancel an RSVP
    Unregister { id: String },

    /// List who is attending an event
    Attendees { id: String },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            data_dir: None,
            command: Commands::Whoami,
        }
    }
}
