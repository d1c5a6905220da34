//! Clubnet - client library for a university clubs platform
//!
//! This library provides an authenticated HTTP client for the clubs backend,
//! persisted session and server selection, account authentication with
//! classified errors, and typed records for clubs, universities, and events.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Authenticated HTTP client with token refresh, endpoint paths
//! - `auth`: Login, signup, verification, and `AuthError` classification
//! - `session`: Persisted authentication state behind `SessionRepository`
//! - `server`: Persisted backend server selection
//! - `storage`: Key-value persistence (file and in-memory backends)
//! - `navigation`: Redirect port used when a session expires
//! - `models`: Clubs, universities, members, events
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use clubnet::{ApiClient, Config, ServerStore, SessionStore};
//! use clubnet::navigation::TerminalNavigator;
//! use clubnet::storage::FileStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let kv = Arc::new(FileStore::new()?);
//!     let server = Arc::new(ServerStore::new(kv.clone(), &config.server.default_url));
//!     server.ready().await?;
//!
//!     let session = Arc::new(SessionStore::new(kv));
//!     let client = ApiClient::from_config(&config, session, Arc::new(TerminalNavigator::new("/clubs")))?;
//!     client.configure(server.url_provider());
//!
//!     let clubs: serde_json::Value = client.get_json("/clubs").await?;
//!     println!("{}", clubs);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod server;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use api::ApiClient;
pub use auth::{AuthError, AuthErrorCode, AuthService};
pub use config::Config;
pub use error::{ClubnetError, Result};
pub use server::ServerStore;
pub use session::{Session, SessionRepository, SessionStore};
