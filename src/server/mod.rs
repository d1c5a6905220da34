//! Persisted backend server selection
//!
//! Holds the URL of the backend the client talks to. Until a user sets one
//! explicitly the configured default is used and `is_configured` is false.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ClubnetError, Result};
use crate::storage::{KeyValueStore, PersistentState};

/// Storage key of the persisted server record.
pub const SERVER_CONFIG_KEY: &str = "clubnet-server-config";

/// Selected backend server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Base URL of the backend API
    pub server_url: String,
    /// True once a user explicitly chose `server_url`
    #[serde(default)]
    pub is_configured: bool,
}

impl ServerConfig {
    /// Unconfigured record pointing at `default_url`.
    pub fn unconfigured(default_url: &str) -> Self {
        Self {
            server_url: default_url.to_string(),
            is_configured: false,
        }
    }
}

/// Validates a server URL.
///
/// # Errors
///
/// Returns [`ClubnetError::InvalidServerUrl`] for input that is not an
/// absolute URL.
pub fn validate_server_url(url: &str) -> Result<url::Url> {
    url::Url::parse(url.trim()).map_err(|e| {
        tracing::debug!("Rejected server URL {:?}: {}", url, e);
        ClubnetError::InvalidServerUrl(url.to_string()).into()
    })
}

/// Persisted [`ServerConfig`]
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use clubnet::server::ServerStore;
/// use clubnet::storage::MemoryStore;
///
/// let store = ServerStore::new(Arc::new(MemoryStore::new()), "http://localhost:8000");
/// assert!(store.set_server_url("not a url").is_err());
/// assert!(!store.is_configured());
///
/// store.set_server_url("https://clubs.example.edu").unwrap();
/// assert!(store.is_configured());
/// ```
#[derive(Debug)]
pub struct ServerStore {
    default_url: String,
    state: PersistentState<ServerConfig>,
}

impl ServerStore {
    /// Create a store backed by `kv`. Nothing is read until `ready()`.
    pub fn new(kv: Arc<dyn KeyValueStore>, default_url: &str) -> Self {
        Self {
            default_url: default_url.to_string(),
            state: PersistentState::new(
                kv,
                SERVER_CONFIG_KEY,
                ServerConfig::unconfigured(default_url),
            ),
        }
    }

    /// Load the persisted selection, once.
    pub async fn ready(&self) -> Result<()> {
        self.state.ready().await
    }

    /// Current record.
    pub fn config(&self) -> ServerConfig {
        self.state.get()
    }

    /// Current base URL.
    pub fn server_url(&self) -> String {
        self.state.get().server_url
    }

    /// True once a URL was explicitly chosen.
    pub fn is_configured(&self) -> bool {
        self.state.get().is_configured
    }

    /// URL used when nothing is configured.
    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    /// Select a new backend.
    ///
    /// # Errors
    ///
    /// Malformed input is rejected with [`ClubnetError::InvalidServerUrl`]
    /// and the current record is left unchanged.
    pub fn set_server_url(&self, url: &str) -> Result<()> {
        validate_server_url(url)?;
        self.state.replace(ServerConfig {
            server_url: url.trim().to_string(),
            is_configured: true,
        })?;
        tracing::info!("Server URL set to {}", url.trim());
        Ok(())
    }

    /// Forget the explicit selection and go back to the default URL.
    pub fn reset_server(&self) -> Result<()> {
        self.state
            .replace(ServerConfig::unconfigured(&self.default_url))?;
        tracing::info!("Server URL reset to default {}", self.default_url);
        Ok(())
    }

    /// Resolver suitable for [`crate::api::ApiClient::configure`].
    ///
    /// The returned closure reads the store on every call, so later
    /// `set_server_url` calls take effect immediately.
    pub fn url_provider(self: &Arc<Self>) -> impl Fn() -> String + Send + Sync + 'static {
        let store = Arc::clone(self);
        move || store.server_url()
    }
}
