//! Calls to the backend auth endpoints
//!
//! Every call returns a classified [`AuthError`] on failure. When an
//! explicit API URL is supplied the call goes straight to that server with
//! a plain HTTP client, bypassing the bearer and refresh handling of
//! [`ApiClient`]. This is how a login form can target a server that has not
//! been saved yet.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::client::{api_error, decode, transport_error};
use crate::api::{endpoints, join_url, ApiClient};
use crate::auth::error::{classify, AuthError};
use crate::auth::types::{
    LoginCredentials, LoginResponse, ResendVerificationResponse, SignupCredentials,
    SignupResponse,
};
use crate::error::Result;

/// Auth endpoint caller
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    /// Use `client` for calls without an explicit API URL.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Underlying API client.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// `POST /auth/login`.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        api_url: Option<&str>,
    ) -> std::result::Result<LoginResponse, AuthError> {
        tracing::debug!("Logging in {}", credentials.email);
        self.post(endpoints::auth::LOGIN, credentials, api_url).await
    }

    /// `POST /auth/register`.
    pub async fn signup(
        &self,
        credentials: &SignupCredentials,
        api_url: Option<&str>,
    ) -> std::result::Result<SignupResponse, AuthError> {
        tracing::debug!("Registering {}", credentials.email);
        self.post(endpoints::auth::REGISTER, credentials, api_url)
            .await
    }

    /// `POST /auth/resend-verification-email`.
    pub async fn resend_verification(
        &self,
        email: &str,
        api_url: Option<&str>,
    ) -> std::result::Result<ResendVerificationResponse, AuthError> {
        let body = serde_json::json!({ "email": email });
        self.post(endpoints::auth::RESEND_VERIFICATION, &body, api_url)
            .await
    }

    async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        api_url: Option<&str>,
    ) -> std::result::Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let result = match api_url {
            Some(base) => self.post_direct(base, path, body).await,
            None => self.client.post_json(path, body).await,
        };
        result.map_err(|e| classify(&e))
    }

    async fn post_direct<B, T>(&self, base: &str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = join_url(base.trim_end_matches('/'), path);
        tracing::debug!("{} {} (direct)", Method::POST, url);

        let response = self
            .client
            .http()
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        decode(response).await
    }
}
