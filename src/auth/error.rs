//! Classification of auth endpoint failures
//!
//! The backend reports auth failures as an HTTP status plus a free-text
//! message. [`classify_response`] maps the pair onto the closed
//! [`AuthErrorCode`] set by case-insensitive phrase matching; more specific
//! phrases are checked before generic ones.
//!
//! The phrase tables are a compatibility shim for a backend that does not
//! yet send structured error codes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClubnetError;

/// Closed set of auth failure reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorCode {
    /// No account exists for the email
    UserNotFound,
    /// Email/password pair rejected
    InvalidCredentials,
    /// Locked after repeated failures
    AccountLocked,
    /// Disabled or suspended by an administrator
    AccountDisabled,
    /// Email address not yet verified
    EmailNotVerified,
    /// Rate limited
    TooManyAttempts,
    /// Request body failed validation
    ValidationError,
    /// Email address rejected by validation
    InvalidEmailFormat,
    /// Password rejected by validation
    WeakPassword,
    /// Username already registered
    UsernameTaken,
    /// Email already registered
    EmailTaken,
    /// Backend failure or unrecognized response
    ServerError,
    /// No response from the backend
    NetworkError,
}

impl AuthErrorCode {
    /// Wire name, e.g. `"invalid_credentials"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserNotFound => "user_not_found",
            Self::InvalidCredentials => "invalid_credentials",
            Self::AccountLocked => "account_locked",
            Self::AccountDisabled => "account_disabled",
            Self::EmailNotVerified => "email_not_verified",
            Self::TooManyAttempts => "too_many_attempts",
            Self::ValidationError => "validation_error",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::WeakPassword => "weak_password",
            Self::UsernameTaken => "username_taken",
            Self::EmailTaken => "email_taken",
            Self::ServerError => "server_error",
            Self::NetworkError => "network_error",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured auth failure returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}: {message}")]
pub struct AuthError {
    /// Short title, e.g. `"Invalid Credentials"`
    pub error: String,
    /// User-facing explanation
    pub message: String,
    /// Machine-readable reason
    pub code: AuthErrorCode,
    /// Extra backend-provided context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AuthError {
    /// Build an error with no details.
    pub fn new(code: AuthErrorCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            code,
            details: None,
        }
    }

    fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    /// The request never produced a response.
    pub fn network(cause: &str) -> Self {
        Self::new(
            AuthErrorCode::NetworkError,
            "Connection Error",
            "Unable to connect to the server. Please check your internet connection and server configuration.",
        )
        .with_details(Some(serde_json::json!({ "originalError": cause })))
    }
}

type PhraseRule = (&'static [&'static str], AuthErrorCode);

const UNAUTHORIZED_RULES: &[PhraseRule] = &[
    (
        &["user not found", "login_user_not_found"],
        AuthErrorCode::UserNotFound,
    ),
    (
        &["invalid credentials", "wrong password"],
        AuthErrorCode::InvalidCredentials,
    ),
    (&["account locked", "locked"], AuthErrorCode::AccountLocked),
    (&["disabled", "suspended"], AuthErrorCode::AccountDisabled),
    (
        &["not verified", "email verification"],
        AuthErrorCode::EmailNotVerified,
    ),
];

const CONFLICT_RULES: &[PhraseRule] = &[
    (&["username"], AuthErrorCode::UsernameTaken),
    (&["email"], AuthErrorCode::EmailTaken),
];

const VALIDATION_RULES: &[PhraseRule] = &[
    (&["password"], AuthErrorCode::WeakPassword),
    (&["email"], AuthErrorCode::InvalidEmailFormat),
];

fn match_rules(message: &str, rules: &[PhraseRule]) -> Option<AuthErrorCode> {
    let lowered = message.to_lowercase();
    rules
        .iter()
        .find(|(phrases, _)| phrases.iter().any(|p| lowered.contains(p)))
        .map(|(_, code)| *code)
}

fn mentions_unverified_email(message: &str) -> bool {
    let m = message.to_lowercase();
    m.contains("not verified") || (m.contains("email") && m.contains("verified") && m.contains("not"))
}

/// Pulls the human-readable message out of a backend error body.
///
/// Looks at `message`, then `error`, then `detail`. A FastAPI-style `detail`
/// array has its `msg` entries joined.
pub fn backend_message(body: Option<&Value>) -> Option<String> {
    let body = body?;
    for field in ["message", "error"] {
        if let Some(s) = body.get(field).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    match body.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

/// Classify an HTTP error response from an auth endpoint.
///
/// `fallback` is used when the body carries no message.
///
/// # Examples
///
/// ```
/// use clubnet::auth::{classify_response, AuthErrorCode};
/// use serde_json::json;
///
/// let body = json!({ "message": "User not found" });
/// let err = classify_response(401, Some(&body), "HTTP 401");
/// assert_eq!(err.code, AuthErrorCode::UserNotFound);
///
/// let err = classify_response(429, None, "HTTP 429");
/// assert_eq!(err.code, AuthErrorCode::TooManyAttempts);
/// ```
pub fn classify_response(status: u16, body: Option<&Value>, fallback: &str) -> AuthError {
    let message = backend_message(body).unwrap_or_else(|| fallback.to_string());
    let details = body.and_then(|b| b.get("details")).cloned();

    let classified = match status {
        401 => match match_rules(&message, UNAUTHORIZED_RULES) {
            Some(AuthErrorCode::UserNotFound) => AuthError::new(
                AuthErrorCode::UserNotFound,
                "Authentication Failed",
                "No account found with this email address. Please check your email or sign up for a new account.",
            ),
            Some(AuthErrorCode::InvalidCredentials) => AuthError::new(
                AuthErrorCode::InvalidCredentials,
                "Invalid Credentials",
                "The email or password you entered is incorrect. Please try again.",
            ),
            Some(AuthErrorCode::AccountLocked) => AuthError::new(
                AuthErrorCode::AccountLocked,
                "Account Locked",
                "Your account has been temporarily locked due to too many failed login attempts. Please try again later or contact support.",
            ),
            Some(AuthErrorCode::AccountDisabled) => AuthError::new(
                AuthErrorCode::AccountDisabled,
                "Account Disabled",
                "Your account has been disabled. Please contact support for assistance.",
            ),
            Some(AuthErrorCode::EmailNotVerified) => email_not_verified(),
            _ => AuthError::new(
                AuthErrorCode::InvalidCredentials,
                "Authentication Failed",
                "Invalid email or password. Please try again.",
            ),
        },
        403 if mentions_unverified_email(&message) => email_not_verified(),
        403 => AuthError::new(
            AuthErrorCode::ServerError,
            "Access Forbidden",
            "Access to this resource is forbidden.",
        ),
        409 => match match_rules(&message, CONFLICT_RULES) {
            Some(AuthErrorCode::UsernameTaken) => AuthError::new(
                AuthErrorCode::UsernameTaken,
                "Username Taken",
                "That username is already in use. Please choose another.",
            ),
            Some(AuthErrorCode::EmailTaken) => AuthError::new(
                AuthErrorCode::EmailTaken,
                "Email Taken",
                "An account with this email address already exists. Try signing in instead.",
            ),
            _ => AuthError::new(AuthErrorCode::ServerError, "Conflict", message.clone()),
        },
        422 => {
            let code = match_rules(&message, VALIDATION_RULES)
                .unwrap_or(AuthErrorCode::ValidationError);
            let text = backend_message(body).unwrap_or_else(|| "Invalid input data".to_string());
            AuthError::new(code, "Validation Error", text)
        }
        429 => AuthError::new(
            AuthErrorCode::TooManyAttempts,
            "Too Many Attempts",
            "Too many login attempts. Please wait a few minutes before trying again.",
        ),
        s if s >= 500 => AuthError::new(
            AuthErrorCode::ServerError,
            "Server Error",
            "A server error occurred. Please try again later.",
        ),
        _ => AuthError::new(
            AuthErrorCode::ServerError,
            "Authentication Error",
            if message.is_empty() {
                "An unexpected error occurred. Please try again.".to_string()
            } else {
                message.clone()
            },
        ),
    };

    classified.with_details(details)
}

fn email_not_verified() -> AuthError {
    AuthError::new(
        AuthErrorCode::EmailNotVerified,
        "Email Not Verified",
        "Please verify your email address before signing in.",
    )
}

/// Classify any failure from an auth call.
///
/// HTTP status failures go through [`classify_response`]; connection
/// failures become [`AuthErrorCode::NetworkError`]; anything else falls back
/// to a generic server error carrying the original message.
pub fn classify(error: &anyhow::Error) -> AuthError {
    if let Some(auth) = error.downcast_ref::<AuthError>() {
        return auth.clone();
    }

    if let Some(typed) = error.downcast_ref::<ClubnetError>() {
        match typed {
            ClubnetError::Api { status, .. } => {
                let body = typed.body_json();
                return classify_response(*status, body.as_ref(), &typed.to_string());
            }
            ClubnetError::Connection(cause) => return AuthError::network(cause),
            _ => {}
        }
    }

    AuthError::new(
        AuthErrorCode::ServerError,
        "Authentication Error",
        error.to_string(),
    )
    .with_details(Some(serde_json::json!({ "originalError": error.to_string() })))
}
