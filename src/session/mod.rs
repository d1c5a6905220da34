//! Client-held authentication state
//!
//! The [`Session`] record is persisted under [`SESSION_KEY`] and shared by the
//! API client and the auth service through the [`SessionRepository`] trait.
//!
//! Lifecycle:
//!
//! ```text
//! Anonymous --login--> Authenticated --refresh--> Authenticated
//! Anonymous --signup--> PendingVerification
//! Authenticated --refresh failure | logout--> Anonymous
//! ```
//!
//! Every transition replaces the whole record in one write.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::error::Result;
use crate::storage::{KeyValueStore, PersistentState};

/// Storage key of the persisted session record.
pub const SESSION_KEY: &str = "clubnet-auth";

/// Authentication state of the local user
///
/// `is_authenticated` is true only when both `user` and `access_token` are
/// present and the last auth call succeeded. Use the constructors rather
/// than building the struct by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The signed-in account
    #[serde(default)]
    pub user: Option<User>,
    /// Bearer credential attached to requests
    #[serde(default)]
    pub access_token: Option<String>,
    /// Credential used to mint new access tokens
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Whether the session is fully signed in
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Coarse lifecycle state of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No credentials
    Anonymous,
    /// Access token from signup, email not yet verified
    PendingVerification,
    /// Signed in
    Authenticated,
}

impl Session {
    /// Empty session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session after a successful login.
    pub fn authenticated(user: User, access_token: String, refresh_token: String) -> Self {
        Self {
            user: Some(user),
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
            is_authenticated: true,
        }
    }

    /// Session after signup: token only, not yet authenticated.
    pub fn pending_verification(access_token: String) -> Self {
        Self {
            user: None,
            access_token: Some(access_token),
            refresh_token: None,
            is_authenticated: false,
        }
    }

    /// Lifecycle state derived from the stored fields.
    pub fn state(&self) -> SessionState {
        if self.is_authenticated {
            SessionState::Authenticated
        } else if self.access_token.is_some() {
            SessionState::PendingVerification
        } else {
            SessionState::Anonymous
        }
    }

    /// Re-establish the authentication invariant on a record of unknown
    /// origin, e.g. one read back from disk.
    pub fn normalized(mut self) -> Self {
        if self.user.is_none() || self.access_token.is_none() {
            self.is_authenticated = false;
        }
        self
    }

    /// Swap in refreshed tokens, keeping every other field.
    ///
    /// The refresh token is only replaced when the backend rotated it.
    pub fn apply_refresh(&mut self, access_token: String, refresh_token: Option<String>) {
        self.access_token = Some(access_token);
        if let Some(refresh) = refresh_token {
            self.refresh_token = Some(refresh);
        }
    }
}

/// Injectable access to the shared session
///
/// The API client depends on this trait rather than on a concrete store so
/// tests and embedders can supply their own.
#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync + std::fmt::Debug {
    /// Resolves once persisted state has been loaded.
    async fn ready(&self) -> Result<()> {
        Ok(())
    }

    /// Snapshot of the current session.
    fn get(&self) -> Session;

    /// Replace the session.
    fn set(&self, session: Session) -> Result<()>;

    /// Drop all credentials, including the persisted record.
    fn clear(&self) -> Result<()>;

    /// Atomically read-modify-write the session and return the new value.
    fn update(&self, apply: &mut dyn FnMut(&mut Session)) -> Result<Session>;
}

/// [`SessionRepository`] persisted through a [`KeyValueStore`]
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use clubnet::session::{Session, SessionRepository, SessionStore};
/// use clubnet::storage::MemoryStore;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let store = SessionStore::new(Arc::new(MemoryStore::new()));
/// store.ready().await?;
/// assert_eq!(store.get(), Session::anonymous());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionStore {
    state: PersistentState<Session>,
}

impl SessionStore {
    /// Create a store backed by `kv`. Nothing is read until `ready()`.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: PersistentState::new(kv, SESSION_KEY, Session::anonymous())
                .with_normalizer(Session::normalized),
        }
    }

    /// True once the persisted session has been loaded.
    pub fn is_hydrated(&self) -> bool {
        self.state.is_hydrated()
    }
}

#[async_trait::async_trait]
impl SessionRepository for SessionStore {
    async fn ready(&self) -> Result<()> {
        self.state.ready().await
    }

    fn get(&self) -> Session {
        self.state.get()
    }

    fn set(&self, session: Session) -> Result<()> {
        self.state.replace(session.normalized())
    }

    fn clear(&self) -> Result<()> {
        self.state.reset(Session::anonymous())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut Session)) -> Result<Session> {
        self.state.modify(&mut |session| {
            apply(session);
            *session = std::mem::take(session).normalized();
        })
    }
}
