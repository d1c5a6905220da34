//! Authenticated HTTP client
//!
//! [`ApiClient`] sends every request to the base URL returned by its
//! provider, attaches the session's bearer token, and recovers from an
//! expired access token by refreshing it once and retrying the request once.
//!
//! When the refresh cannot happen (no refresh token, or the refresh endpoint
//! rejects it) the session is cleared and the [`Navigator`] is asked to show
//! the login surface, unless the user is on a public route or the request
//! targeted a public endpoint. The original 401 is returned in both cases.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::endpoints;
use crate::auth::TokenPair;
use crate::config::{Config, NavigationConfig, DEFAULT_SERVER_URL};
use crate::error::{ClubnetError, Result};
use crate::navigation::{self, Navigator};
use crate::session::SessionRepository;

/// Resolves the base URL at request time.
pub type UrlProvider = Arc<dyn Fn() -> String + Send + Sync>;

/// Refreshes allowed per request before a 401 is final.
const MAX_REFRESH_ATTEMPTS: u32 = 1;

/// HTTP client with bearer auth and single refresh-and-retry
pub struct ApiClient {
    http: reqwest::Client,
    base_url: RwLock<UrlProvider>,
    session: Arc<dyn SessionRepository>,
    navigator: Arc<dyn Navigator>,
    navigation: NavigationConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url())
            .field("navigator", &self.navigator)
            .field("navigation", &self.navigation)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client against the built-in server URL.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(
        session: Arc<dyn SessionRepository>,
        navigator: Arc<dyn Navigator>,
        navigation: NavigationConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClubnetError::Http)?;

        Ok(Self {
            http,
            base_url: RwLock::new(Arc::new(|| DEFAULT_SERVER_URL.to_string())),
            session,
            navigator,
            navigation,
        })
    }

    /// Build a client from loaded configuration.
    ///
    /// The base URL provider returns `server.default_url` until
    /// [`configure`](Self::configure) installs another one.
    pub fn from_config(
        config: &Config,
        session: Arc<dyn SessionRepository>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Self::new(
            session,
            navigator,
            config.navigation.clone(),
            Duration::from_secs(config.server.timeout_seconds),
        )?;
        let default_url = config.server.default_url.clone();
        client.configure(move || default_url.clone());
        Ok(client)
    }

    /// Install the base URL resolver.
    ///
    /// Takes effect for the next request; the provider is called once per
    /// request and never cached.
    pub fn configure<F>(&self, provider: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let mut slot = self
            .base_url
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Arc::new(provider);
    }

    /// Base URL the next request will use.
    pub fn base_url(&self) -> String {
        let provider = Arc::clone(
            &self
                .base_url
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        provider()
    }

    /// Shared session used for bearer auth.
    pub fn session(&self) -> &Arc<dyn SessionRepository> {
        &self.session
    }

    /// Plain HTTP client with the configured timeout and no auth handling.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Absolute URL of `path` on the current server.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url(), path)
    }

    /// Send a request with bearer auth and expired-session recovery.
    ///
    /// Returns the response for any 2xx status. Other statuses are returned
    /// as [`ClubnetError::Api`]; transport failures as
    /// [`ClubnetError::Connection`]. A 401 on a credential endpoint
    /// (`/auth/login`, `/auth/register`) is never treated as an expired
    /// session.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response> {
        self.session.ready().await?;

        let mut attempt = 0;
        loop {
            let response = self.send(method.clone(), path, body).await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let error = api_error(response).await;
            if status != StatusCode::UNAUTHORIZED || endpoints::auth::is_credential_endpoint(path)
            {
                return Err(error);
            }

            if attempt >= MAX_REFRESH_ATTEMPTS {
                tracing::debug!("{} {} still unauthorized after refresh", method, path);
                return Err(error);
            }
            attempt += 1;

            match self.refresh_access_token().await {
                Ok(_) => {
                    tracing::debug!("Retrying {} {} with refreshed token", method, path);
                }
                Err(refresh_error) => {
                    tracing::warn!("Token refresh failed: {}", refresh_error);
                    self.expire_session(path);
                    return Err(error);
                }
            }
        }
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response> {
        let url = self.url_for(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(token) = self.session.get().access_token {
            tracing::debug!("Attaching bearer token");
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(transport_error)
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// On success the session's tokens are replaced in one write and every
    /// other field is kept. On failure the session is left as it was.
    ///
    /// # Errors
    ///
    /// [`ClubnetError::NoRefreshToken`] when the session holds no refresh
    /// token (no request is made), [`ClubnetError::Refresh`] when the
    /// backend rejects it, [`ClubnetError::Connection`] when it cannot be
    /// reached.
    pub async fn refresh_access_token(&self) -> Result<TokenPair> {
        let Some(refresh_token) = self.session.get().refresh_token else {
            return Err(ClubnetError::NoRefreshToken.into());
        };

        let url = self.url_for(endpoints::auth::REFRESH);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClubnetError::Refresh(format!("HTTP {}: {}", status.as_u16(), body)).into());
        }

        let tokens: TokenPair = decode(response).await?;
        self.session.update(&mut |session| {
            session.apply_refresh(tokens.access_token.clone(), tokens.refresh_token.clone())
        })?;
        tracing::info!("Access token refreshed");
        Ok(tokens)
    }

    fn expire_session(&self, path: &str) {
        if let Err(e) = self.session.clear() {
            tracing::warn!("Failed to clear expired session: {}", e);
        }

        if navigation::should_redirect(self.navigator.as_ref(), path, &self.navigation) {
            self.navigator.redirect(&self.navigation.login_route);
        } else {
            tracing::debug!("Session expired on a public path, not redirecting");
        }
    }

    /// `GET` and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path, None).await?;
        decode(response).await
    }

    /// `POST` a JSON body and decode the JSON reply.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.request(Method::POST, path, Some(&body)).await?;
        decode(response).await
    }

    /// `PUT` a JSON body and decode the JSON reply.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let response = self.request(Method::PUT, path, Some(&body)).await?;
        decode(response).await
    }

    /// `DELETE`, discarding any reply body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request(Method::DELETE, path, None).await?;
        Ok(())
    }
}

/// Join a base URL and an endpoint path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Map a failed send to [`ClubnetError::Connection`].
pub(crate) fn transport_error(error: reqwest::Error) -> anyhow::Error {
    let reason = if error.is_timeout() {
        format!("request timed out: {}", error)
    } else {
        error.to_string()
    };
    ClubnetError::Connection(reason).into()
}

/// Turn a non-success response into [`ClubnetError::Api`].
pub(crate) async fn api_error(response: Response) -> anyhow::Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClubnetError::Api { status, body }.into()
}

/// Decode a JSON body; unreadable bodies count as connection failures.
///
/// An empty body (e.g. `204 No Content`) decodes as JSON `null`, so callers
/// expecting `()`, `Option<_>` or [`Value`] accept it.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClubnetError::Connection(format!("Malformed response: {}", e)))?;
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };
    serde_json::from_slice(body)
        .map_err(|e| ClubnetError::Connection(format!("Malformed response: {}", e)).into())
}
