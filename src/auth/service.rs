//! Account actions over the shared session
//!
//! [`AuthService`] is the only writer of the session apart from the API
//! client's token refresh.

use std::sync::{Arc, Mutex};

use crate::auth::api::AuthApi;
use crate::auth::error::{classify, AuthError};
use crate::auth::types::{
    LoginCredentials, ResendVerificationResponse, SignupCredentials, SignupResponse, User,
};
use crate::error::Result;
use crate::session::{Session, SessionRepository};

/// Login, signup, and logout against the shared session
#[derive(Debug)]
pub struct AuthService {
    api: AuthApi,
    session: Arc<dyn SessionRepository>,
    last_error: Mutex<Option<AuthError>>,
}

impl AuthService {
    /// Create a service writing to the session of `api`'s client.
    pub fn new(api: AuthApi) -> Self {
        let session = Arc::clone(api.client().session());
        Self {
            api,
            session,
            last_error: Mutex::new(None),
        }
    }

    /// Sign in and store the authenticated session.
    ///
    /// # Errors
    ///
    /// The classified failure, which is also kept as [`last_error`](Self::last_error).
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        api_url: Option<&str>,
    ) -> std::result::Result<User, AuthError> {
        self.clear_error();

        let outcome = match self.api.login(credentials, api_url).await {
            Ok(response) => {
                let user = response.user.clone();
                self.session
                    .set(Session::authenticated(
                        response.user,
                        response.access_token,
                        response.refresh_token,
                    ))
                    .map(|_| user)
                    .map_err(|e| classify(&e))
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(user) => {
                tracing::info!("Logged in as {}", user.username);
                Ok(user)
            }
            Err(e) => {
                tracing::error!("Login failed: code={} error={}", e.code, e.error);
                Err(self.record(e))
            }
        }
    }

    /// Create an account and store its unverified access token.
    ///
    /// The session stays unauthenticated until the email is verified and
    /// the user logs in.
    pub async fn signup(
        &self,
        credentials: &SignupCredentials,
        api_url: Option<&str>,
    ) -> std::result::Result<SignupResponse, AuthError> {
        self.clear_error();

        let outcome = match self.api.signup(credentials, api_url).await {
            Ok(response) => self
                .session
                .set(Session::pending_verification(response.access_token.clone()))
                .map(|_| response)
                .map_err(|e| classify(&e)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(response) => {
                tracing::info!(
                    "Registered {} (verified: {})",
                    credentials.username,
                    response.is_verified
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!("Signup failed: code={} error={}", e.code, e.error);
                Err(self.record(e))
            }
        }
    }

    /// Ask the backend to send the verification email again.
    pub async fn resend_verification(
        &self,
        email: &str,
        api_url: Option<&str>,
    ) -> std::result::Result<ResendVerificationResponse, AuthError> {
        self.api
            .resend_verification(email, api_url)
            .await
            .map_err(|e| self.record(e))
    }

    /// Drop the session and any recorded error.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        self.clear_error();
        tracing::info!("Logged out");
        Ok(())
    }

    /// Signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.session.get().user
    }

    /// True when the session is fully authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.session.get().is_authenticated
    }

    /// True when the signed-in user holds `permission`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.session
            .get()
            .user
            .is_some_and(|user| user.has_permission(permission))
    }

    /// Failure of the most recent login, signup, or resend.
    pub fn last_error(&self) -> Option<AuthError> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    /// Replace the recorded error.
    pub fn set_error(&self, error: AuthError) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(error);
        }
    }

    /// Forget the recorded error.
    pub fn clear_error(&self) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = None;
        }
    }

    fn record(&self, error: AuthError) -> AuthError {
        self.set_error(error.clone());
        error
    }
}
