//! Configuration management for Clubnet
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ClubnetError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Clubnet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Login redirect and public allowlist settings
    #[serde(default)]
    pub navigation: NavigationConfig,
    /// Local persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server URL used until the user configures one explicitly
    #[serde(default = "default_server_url")]
    pub default_url: String,

    /// Hard timeout applied to every HTTP request (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Built-in backend URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            default_url: default_server_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Controls where an expired session is sent and which contexts are exempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Route of the login surface
    #[serde(default = "default_login_route")]
    pub login_route: String,

    /// Routes on which an auth failure never forces a redirect
    ///
    /// A route matches exactly or as a prefix followed by `/`.
    #[serde(default = "default_public_routes")]
    pub public_routes: Vec<String>,

    /// Request path fragments that never force a redirect
    #[serde(default = "default_public_endpoints")]
    pub public_endpoints: Vec<String>,
}

fn default_login_route() -> String {
    "/auth/login".to_string()
}

fn default_public_routes() -> Vec<String> {
    vec![
        "/".to_string(),
        "/server-setup".to_string(),
        "/download".to_string(),
    ]
}

fn default_public_endpoints() -> Vec<String> {
    vec![
        "/analytics".to_string(),
        "/health".to_string(),
        "/public".to_string(),
    ]
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_route: default_login_route(),
            public_routes: default_public_routes(),
            public_endpoints: default_public_endpoints(),
        }
    }
}

/// Local persistence settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted session and server records
    ///
    /// Overridden by `CLUBNET_DATA_DIR` and `--data-dir`. When none of the
    /// three is set, the platform data directory is used.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClubnetError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ClubnetError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("CLUBNET_SERVER_URL") {
            self.server.default_url = url;
        }

        if let Ok(timeout) = std::env::var("CLUBNET_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.server.timeout_seconds = secs,
                Err(_) => tracing::warn!(
                    "Ignoring CLUBNET_TIMEOUT_SECONDS={}: not a number",
                    timeout
                ),
            }
        }

        if let Ok(dir) = std::env::var("CLUBNET_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(dir) = &cli.data_dir {
            self.storage.data_dir = Some(dir.clone());
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.server.default_url.trim().is_empty() {
            return Err(
                ClubnetError::Config("server.default_url cannot be empty".to_string()).into(),
            );
        }

        if url::Url::parse(&self.server.default_url).is_err() {
            return Err(ClubnetError::Config(format!(
                "server.default_url is not a valid URL: {}",
                self.server.default_url
            ))
            .into());
        }

        if self.server.timeout_seconds == 0 {
            return Err(ClubnetError::Config(
                "server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !self.navigation.login_route.starts_with('/') {
            return Err(ClubnetError::Config(format!(
                "navigation.login_route must start with '/': {}",
                self.navigation.login_route
            ))
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            navigation: NavigationConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
