//! Expired-session recovery tests using wiremock
//!
//! Verifies the refresh-and-retry behaviour of `ApiClient::request`:
//!
//! - A single 401 triggers exactly one refresh and one retry.
//! - A persistent 401 triggers at most one refresh.
//! - 401 from the login and register endpoints is returned untouched.
//! - A session without a refresh token is cleared without calling the
//!   refresh endpoint.
//! - Public routes and endpoints suppress the login redirect.

mod common;

use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clubnet::session::{Session, SessionRepository};
use clubnet::ClubnetError;

use common::{harness, sample_user, sign_in};

fn api_status(err: &anyhow::Error) -> Option<u16> {
    err.downcast_ref::<ClubnetError>().and_then(|e| e.status())
}

// ---------------------------------------------------------------------------
// Refresh and retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_single_401_refreshes_once_and_retries_once() {
    let h = harness("/clubs").await;
    sign_in(&h.session, "stale", "r1");

    Mock::given(method("GET"))
        .and(path("/clubs"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refresh_token": "r1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "fresh", "refresh_token": "r2"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/clubs"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&h.server)
        .await;

    let clubs: Vec<serde_json::Value> = h.client.get_json("/clubs").await.unwrap();
    assert!(clubs.is_empty());

    let session = h.session.get();
    assert_eq!(session.access_token.as_deref(), Some("fresh"));
    assert_eq!(session.refresh_token.as_deref(), Some("r2"));
    assert_eq!(session.user, Some(sample_user()));
    assert!(session.is_authenticated);
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_repeated_401_refreshes_at_most_once() {
    let h = harness("/clubs").await;
    sign_in(&h.session, "stale", "r1");

    Mock::given(method("GET"))
        .and(path("/clubs/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h
        .client
        .request(Method::GET, "/clubs/7", None)
        .await
        .unwrap_err();
    assert_eq!(api_status(&err), Some(401));

    // The refresh itself succeeded, so the session survives with the new token.
    let session = h.session.get();
    assert_eq!(session.access_token.as_deref(), Some("fresh"));
    assert_eq!(session.refresh_token.as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_refresh_rejected_clears_session_and_redirects() {
    let h = harness("/clubs").await;
    sign_in(&h.session, "stale", "revoked");

    Mock::given(method("GET"))
        .and(path("/clubs/me/clubs"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "revoked"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h
        .client
        .request(Method::GET, "/clubs/me/clubs", None)
        .await
        .unwrap_err();
    assert_eq!(api_status(&err), Some(401));
    assert_eq!(h.session.get(), Session::anonymous());
    assert_eq!(h.navigator.redirects(), vec!["/auth/login"]);
}

// ---------------------------------------------------------------------------
// Credential endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_401_never_refreshes() {
    let h = harness("/auth/login").await;
    sign_in(&h.session, "stale", "r1");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "x"})))
        .expect(0)
        .mount(&h.server)
        .await;

    let body = json!({"email": "a@b.edu", "password": "short"});
    let err = h
        .client
        .request(Method::POST, "/auth/login", Some(&body))
        .await
        .unwrap_err();

    match err.downcast_ref::<ClubnetError>() {
        Some(ClubnetError::Api { status, body }) => {
            assert_eq!(*status, 401);
            assert!(body.contains("Invalid credentials"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(h.session.get().access_token.as_deref(), Some("stale"));
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_register_401_never_refreshes() {
    let h = harness("/auth/signup").await;
    sign_in(&h.session, "stale", "r1");

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h
        .client
        .request(Method::POST, "/auth/register", Some(&json!({})))
        .await
        .unwrap_err();
    assert_eq!(api_status(&err), Some(401));
}

// ---------------------------------------------------------------------------
// Missing refresh token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_no_refresh_token_clears_session_without_network_refresh() {
    let h = harness("/events").await;
    h.session
        .set(Session::pending_verification("signup-token".to_string()))
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/clubs/7/events"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h
        .client
        .request(Method::GET, "/clubs/7/events", None)
        .await
        .unwrap_err();
    assert_eq!(api_status(&err), Some(401));
    assert_eq!(h.session.get(), Session::anonymous());
    assert_eq!(h.navigator.redirects(), vec!["/auth/login"]);
}

// ---------------------------------------------------------------------------
// Public allowlist
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_public_route_suppresses_redirect() {
    let h = harness("/server-setup").await;
    sign_in(&h.session, "stale", "r1");

    Mock::given(method("GET"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h.client.request(Method::GET, "/clubs", None).await.is_err());
    assert_eq!(h.session.get(), Session::anonymous());
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_public_endpoint_suppresses_redirect() {
    let h = harness("/clubs").await;
    sign_in(&h.session, "stale", "r1");

    Mock::given(method("GET"))
        .and(path("/clubs/analytics/summary"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h
        .client
        .request(Method::GET, "/clubs/analytics/summary", None)
        .await
        .is_err());
    assert_eq!(h.session.get(), Session::anonymous());
    assert!(h.navigator.redirects().is_empty());
}

// ---------------------------------------------------------------------------
// Other statuses, base URL, bearer header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_other_errors_propagate_without_refresh() {
    let h = harness("/clubs").await;
    sign_in(&h.session, "token", "r1");

    Mock::given(method("GET"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h.client.request(Method::GET, "/clubs", None).await.unwrap_err();
    assert_eq!(api_status(&err), Some(503));
    assert!(h.session.get().is_authenticated);
}

#[tokio::test]
async fn test_anonymous_request_has_no_bearer() {
    let h = harness("/").await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let health: serde_json::Value = h.client.get_json("/health").await.unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn test_base_url_provider_is_read_per_request() {
    let h = harness("/clubs").await;
    let other = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/clubs/universities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/clubs/universities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&other)
        .await;

    let _: serde_json::Value = h.client.get_json("/clubs/universities").await.unwrap();
    let uri = other.uri();
    h.client.configure(move || uri.clone());
    let _: serde_json::Value = h.client.get_json("/clubs/universities").await.unwrap();
}

#[tokio::test]
async fn test_connection_failure_is_connection_error() {
    let h = harness("/clubs").await;
    h.client.configure(|| "http://127.0.0.1:1".to_string());

    let err = h.client.request(Method::GET, "/clubs", None).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ClubnetError>(),
        Some(ClubnetError::Connection(_))
    ));
}

#[tokio::test]
async fn test_malformed_body_is_connection_error() {
    let h = harness("/clubs").await;

    Mock::given(method("GET"))
        .and(path("/clubs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&h.server)
        .await;

    let err = h
        .client
        .get_json::<Vec<serde_json::Value>>("/clubs")
        .await
        .unwrap_err();
    assert!(err
        .downcast_ref::<ClubnetError>()
        .is_some_and(ClubnetError::is_connection));
}

#[tokio::test]
async fn test_empty_success_body_decodes_as_null() {
    let h = harness("/events").await;
    sign_in(&h.session, "a1", "r1");

    Mock::given(method("POST"))
        .and(path("/clubs/events/e1/register"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    let reply: serde_json::Value = h
        .client
        .post_json("/clubs/events/e1/register", &json!({}))
        .await
        .unwrap();
    assert!(reply.is_null());
}
