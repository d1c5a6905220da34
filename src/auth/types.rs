//! Request and response records for the backend auth endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account record returned by login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user identifier
    pub id: String,
    /// Display handle
    pub username: String,
    /// Account email
    pub email: String,
    /// Permission names granted to the account
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl User {
    /// True when `permission` is listed for this user.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Account email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupCredentials {
    /// Requested handle
    pub username: String,
    /// Account email
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Subscription plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Requested role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The signed-in account
    pub user: User,
    /// Short-lived bearer credential
    pub access_token: String,
    /// Credential used to mint new access tokens
    pub refresh_token: String,
}

/// Successful signup
///
/// Signup does not return a refresh token or a user; the account is not
/// usable until its email address is verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    /// Short-lived bearer credential
    pub access_token: String,
    /// Token scheme, normally `bearer`
    #[serde(default)]
    pub token_type: String,
    /// Issue time, seconds since the epoch
    #[serde(default)]
    pub issued_at: i64,
    /// Expiry time, seconds since the epoch
    #[serde(default)]
    pub expires_at: i64,
    /// Whether the email address is already verified
    #[serde(default)]
    pub is_verified: bool,
    /// Whether two-factor authentication is on
    #[serde(default)]
    pub two_fa_enabled: bool,
}

impl SignupResponse {
    /// Expiry of the issued access token, if the backend sent one.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        if self.expires_at <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.expires_at, 0)
    }
}

/// Response of `POST /auth/resend-verification-email`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendVerificationResponse {
    /// Whether the backend queued the email
    pub success: bool,
    /// Human-readable status
    #[serde(default)]
    pub message: String,
}

/// Response of `POST /auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Replacement access token
    pub access_token: String,
    /// Replacement refresh token, when the backend rotates it
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_has_permission() {
        let user = User {
            id: "u1".into(),
            username: "ada".into(),
            email: "ada@uni.edu".into(),
            permissions: vec!["clubs:create".into(), "events:create".into()],
        };
        assert!(user.has_permission("clubs:create"));
        assert!(!user.has_permission("clubs:delete"));
    }

    #[test]
    fn test_user_without_permissions_field() {
        let user: User =
            serde_json::from_str(r#"{"id":"1","username":"a","email":"a@b.edu"}"#).unwrap();
        assert!(user.permissions.is_empty());
    }

    #[test]
    fn test_signup_credentials_omit_empty_optionals() {
        let creds = SignupCredentials {
            username: "ada".into(),
            email: "ada@uni.edu".into(),
            password: "hunter22".into(),
            plan: None,
            role: Some("student".into()),
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert!(json.get("plan").is_none());
        assert_eq!(json["role"], "student");
    }

    #[test]
    fn test_signup_response_expiry() {
        let resp: SignupResponse = serde_json::from_str(
            r#"{"access_token":"t","token_type":"bearer","issued_at":1700000000,
                "expires_at":1700003600,"is_verified":false,"two_fa_enabled":false}"#,
        )
        .unwrap();
        let expiry = resp.expires_at_utc().unwrap();
        assert_eq!(expiry.timestamp(), 1_700_003_600);
    }

    #[test]
    fn test_signup_response_missing_expiry() {
        let resp: SignupResponse = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        assert!(resp.expires_at_utc().is_none());
    }

    #[test]
    fn test_token_pair_without_rotation() {
        let pair: TokenPair = serde_json::from_str(r#"{"access_token":"new"}"#).unwrap();
        assert_eq!(pair.access_token, "new");
        assert!(pair.refresh_token.is_none());
    }
}
