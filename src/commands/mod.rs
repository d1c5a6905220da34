/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `server` : Show, set, or reset the backend server
- `auth`   : Login, signup, logout, whoami, resend-verification
- `browse` : Clubs, universities, and events
- `request`: Raw authenticated request

Every handler receives an [`AppContext`] that wires the persisted stores to
the API client.
*/

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{AuthApi, AuthService};
use crate::cli::Commands;
use crate::config::Config;
use crate::error::Result;
use crate::navigation::{Navigator, TerminalNavigator};
use crate::server::ServerStore;
use crate::session::{SessionRepository, SessionStore};
use crate::storage::{FileStore, KeyValueStore};

pub mod auth;
pub mod browse;
pub mod request;
pub mod server;

/// Everything a command needs, built once per invocation
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub server: Arc<ServerStore>,
    pub session: Arc<SessionStore>,
    pub client: Arc<ApiClient>,
    pub auth: AuthService,
}

impl AppContext {
    /// Open the data directory and build the stores and client.
    ///
    /// # Errors
    ///
    /// Fails if the data directory cannot be created or a persisted record
    /// cannot be read.
    pub async fn build(config: Config, route: &str) -> Result<Self> {
        let kv: Arc<dyn KeyValueStore> = match &config.storage.data_dir {
            Some(dir) => Arc::new(FileStore::with_dir(dir)?),
            None => Arc::new(FileStore::new()?),
        };
        Self::with_store(config, kv, Arc::new(TerminalNavigator::new(route))).await
    }

    /// Build against an arbitrary store and navigator.
    pub async fn with_store(
        config: Config,
        kv: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let server = Arc::new(ServerStore::new(
            Arc::clone(&kv),
            &config.server.default_url,
        ));
        server.ready().await?;

        let session = Arc::new(SessionStore::new(kv));
        session.ready().await?;

        let client = Arc::new(ApiClient::from_config(
            &config,
            Arc::clone(&session) as Arc<dyn SessionRepository>,
            navigator,
        )?);
        client.configure(server.url_provider());

        let auth = AuthService::new(AuthApi::new(Arc::clone(&client)));

        Ok(Self {
            config,
            server,
            session,
            client,
            auth,
        })
    }
}

/// Route the CLI reports to the navigator while running `command`.
///
/// Server setup is a public route, so an expired session there never
/// prints the sign-in hint.
pub fn route_for(command: &Commands) -> &'static str {
    match command {
        Commands::Server { .. } => "/server-setup",
        Commands::Login { .. } | Commands::Logout => "/auth/login",
        Commands::Signup { .. } | Commands::ResendVerification { .. } => "/auth/signup",
        Commands::Clubs { .. } => "/clubs",
        Commands::Universities { .. } => "/universities",
        Commands::Events { .. } => "/events",
        Commands::Whoami | Commands::Request { .. } => "/dashboard",
    }
}
