use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use wiremock::MockServer;

use clubnet::auth::User;
use clubnet::config::NavigationConfig;
use clubnet::navigation::RecordingNavigator;
use clubnet::session::{Session, SessionRepository, SessionStore};
use clubnet::storage::MemoryStore;
use clubnet::ApiClient;

/// Mock backend plus a client wired to it
#[allow(dead_code)]
pub struct Harness {
    pub server: MockServer,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: Arc<ApiClient>,
}

/// Start a mock backend and point a fresh client at it.
///
/// The navigator reports `route` as the current location.
#[allow(dead_code)]
pub async fn harness(route: &str) -> Harness {
    let server = MockServer::start().await;
    let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
    let navigator = Arc::new(RecordingNavigator::new(route));

    let client = ApiClient::new(
        Arc::clone(&session) as Arc<dyn SessionRepository>,
        Arc::clone(&navigator) as Arc<dyn clubnet::navigation::Navigator>,
        NavigationConfig::default(),
        Duration::from_secs(5),
    )
    .expect("failed to build client");
    let uri = server.uri();
    client.configure(move || uri.clone());

    Harness {
        server,
        session,
        navigator,
        client: Arc::new(client),
    }
}

#[allow(dead_code)]
pub fn sample_user() -> User {
    User {
        id: "u-42".to_string(),
        username: "ada".to_string(),
        email: "ada@uni.edu".to_string(),
        permissions: vec!["clubs:create".to_string()],
    }
}

/// Store an authenticated session with the given tokens.
#[allow(dead_code)]
pub fn sign_in(session: &SessionStore, access: &str, refresh: &str) {
    session
        .set(Session::authenticated(
            sample_user(),
            access.to_string(),
            refresh.to_string(),
        ))
        .expect("failed to store session");
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
