//! Account authentication
//!
//! - [`types`] -- request and response records
//! - [`error`] -- [`AuthError`] and failure classification
//! - [`api`] -- calls to the auth endpoints
//! - [`service`] -- login, signup, and logout over the shared session

pub mod api;
pub mod error;
pub mod service;
pub mod types;

pub use api::AuthApi;
pub use error::{classify, classify_response, AuthError, AuthErrorCode};
pub use service::AuthService;
pub use types::{
    LoginCredentials, LoginResponse, ResendVerificationResponse, SignupCredentials,
    SignupResponse, TokenPair, User,
};
