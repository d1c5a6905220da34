//! Backend access
//!
//! - [`client`] -- authenticated HTTP client with token refresh
//! - [`endpoints`] -- backend path builders

pub mod client;
pub mod endpoints;

pub use client::{join_url, ApiClient, UrlProvider};
