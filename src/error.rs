//! Error types for Clubnet
//!
//! This module defines the error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Clubnet operations
///
/// Authentication endpoints surface the richer [`crate::auth::AuthError`]
/// instead; everything else (storage, configuration, transport, HTTP status
/// failures) is reported through this enum.
#[derive(Error, Debug)]
pub enum ClubnetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistence errors (data directory, record files)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A server URL failed validation
    #[error("Invalid server URL format: {0}")]
    InvalidServerUrl(String),

    /// The server could not be reached or returned something unreadable
    ///
    /// Never retried automatically; the user retries or fixes the server
    /// configuration.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status returned by the backend
    #[error("HTTP {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body (usually JSON)
        body: String,
    },

    /// Token refresh requested without a stored refresh token
    #[error("No refresh token available")]
    NoRefreshToken,

    /// The refresh endpoint rejected the refresh token
    #[error("Token refresh failed: {0}")]
    Refresh(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClubnetError {
    /// Returns the HTTP status for [`ClubnetError::Api`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parses the body of an [`ClubnetError::Api`] as JSON, if possible.
    pub fn body_json(&self) -> Option<serde_json::Value> {
        match self {
            Self::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// True for errors where no HTTP response was received.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type alias for Clubnet operations
///
/// Uses `anyhow::Error` so callers can attach context; typed errors are
/// recovered with `downcast_ref::<ClubnetError>()`.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ClubnetError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_api_error_display_includes_status() {
        let error = ClubnetError::Api {
            status: 404,
            body: "{\"detail\":\"Not Found\"}".to_string(),
        };
        assert!(error.to_string().starts_with("HTTP 404"));
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_api_error_body_json() {
        let error = ClubnetError::Api {
            status: 401,
            body: "{\"message\":\"expired\"}".to_string(),
        };
        let body = error.body_json().unwrap();
        assert_eq!(body["message"], "expired");
    }

    #[test]
    fn test_api_error_body_json_non_json_is_none() {
        let error = ClubnetError::Api {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert!(error.body_json().is_none());
    }

    #[test]
    fn test_no_refresh_token_display() {
        assert_eq!(
            ClubnetError::NoRefreshToken.to_string(),
            "No refresh token available"
        );
    }

    #[test]
    fn test_invalid_server_url_display() {
        let error = ClubnetError::InvalidServerUrl("not a url".to_string());
        assert_eq!(error.to_string(), "Invalid server URL format: not a url");
    }

    #[test]
    fn test_connection_error_is_connection() {
        let error = ClubnetError::Connection("refused".to_string());
        assert!(error.is_connection());
        assert!(error.status().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ClubnetError = io_error.into();
        assert!(matches!(error, ClubnetError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ClubnetError = json_error.into();
        assert!(matches!(error, ClubnetError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ClubnetError = yaml_error.into();
        assert!(matches!(error, ClubnetError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClubnetError>();
    }
}
