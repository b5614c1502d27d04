//! Command-line interface definition for Artdesk
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for authentication, article management and the
//! interactive shell.

use clap::{Parser, Subcommand};

use crate::config::TokenBackend;
use crate::types::ArticleId;

/// Artdesk - manage articles on a Strapi-style CMS backend
///
/// Log in once; the session token is persisted and reused by every
/// following command until `logout`.
#[derive(Parser, Debug, Clone)]
#[command(name = "artdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "ARTDESK_LOG_JSON")]
    pub json_logs: bool,

    /// Override the backend base URL (e.g. http://localhost:1337/api)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Override where the session token is persisted (keyring, file, memory)
    #[arg(long)]
    pub token_backend: Option<TokenBackend>,

    /// Do not print notifications
    #[arg(short, long)]
    pub quiet: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Artdesk
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an account and log in with it
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "ARTDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in with an email address or username
    Login {
        /// Email address or username
        #[arg(short, long)]
        identifier: String,

        #[arg(short, long, env = "ARTDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the persisted session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage articles
    Articles {
        #[command(subcommand)]
        command: ArticleCommand,
    },

    /// Interactive session with an edit form
    Shell,
}

/// Article management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ArticleCommand {
    /// List the session's articles
    List {
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create an article
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Update an article; omitted fields keep their current value
    Update {
        #[arg(long)]
        id: ArticleId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete an article
    Delete {
        #[arg(long)]
        id: ArticleId,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
