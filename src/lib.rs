//! Artdesk - article management client library
//!
//! This library provides a client for a Strapi-style REST backend: account
//! registration and login, a persisted session token, and create, read,
//! update and delete of the session's articles through a single edit form.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `transport`: request/response model, HTTP transport and a scripted fake
//! - `session`: register, login, logout and session restore
//! - `articles`: the in-memory article list and its remote mutations
//! - `form`: the edit buffer deciding between create and update
//! - `manager`: the top-level state machine tying the above together
//! - `storage`: where the session token is persisted
//! - `notify`: transient user notifications
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use artdesk::notify::ConsoleNotifier;
//! use artdesk::storage::MemoryTokenStore;
//! use artdesk::transport::http::HttpTransport;
//! use artdesk::ArticleManager;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let transport = HttpTransport::new(
//!         "http://localhost:1337/api".parse()?,
//!         std::time::Duration::from_secs(30),
//!     )?;
//!     let mut manager = ArticleManager::new(
//!         Arc::new(transport),
//!         Box::new(MemoryTokenStore::new()),
//!         Box::new(ConsoleNotifier),
//!     );
//!
//!     manager.login("alice", "pw1").await?;
//!     manager.create_article("Hello", "First post").await?;
//!     Ok(())
//! }
//! ```

pub mod articles;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod manager;
pub mod notify;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ArtdeskError, Result};
pub use manager::ArticleManager;
pub use types::{Article, ArticleId, User};
