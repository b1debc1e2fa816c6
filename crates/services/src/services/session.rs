//! Per-browser authentication state and the store that holds it.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use moka::future::Cache;
use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

/// The signed-in operator as shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
pub struct Identity {
    pub email: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Not known yet; protected content must not render.
    Resolving,
    SignedOut,
    SignedIn(Identity),
}

/// What the route guard does with a request in a given auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Wait,
    RedirectToLogin,
    Allow(Identity),
}

pub fn guard(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Resolving => GuardDecision::Wait,
        AuthState::SignedOut => GuardDecision::RedirectToLogin,
        AuthState::SignedIn(identity) => GuardDecision::Allow(identity.clone()),
    }
}

/// A session is dropped after this long without a request.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(8 * 60 * 60);
/// A session is dropped this long after sign-in regardless of activity.
pub const MAX_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

struct SessionState {
    auth: AuthState,
    access_token: Option<SecretString>,
    /// When the backend token stops being accepted.
    expires_at: Option<Instant>,
}

impl SessionState {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }

    fn current(&self) -> AuthState {
        match &self.auth {
            AuthState::SignedIn(_) if self.expired() => AuthState::SignedOut,
            auth => auth.clone(),
        }
    }
}

/// Authentication state of one browser session.
pub struct SessionContext {
    state: RwLock<SessionState>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState {
                auth: AuthState::Resolving,
                access_token: None,
                expires_at: None,
            }),
        }
    }

    /// Current state; a session whose token has expired reads as signed out.
    pub async fn state(&self) -> AuthState {
        self.state.read().await.current()
    }

    pub async fn identity(&self) -> Option<Identity> {
        match self.state().await {
            AuthState::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }

    /// Token for backends that authorize per user.
    pub async fn access_token(&self) -> Option<SecretString> {
        let state = self.state.read().await;
        if state.expired() {
            return None;
        }
        state.access_token.clone()
    }

    pub async fn sign_in(
        &self,
        identity: Identity,
        access_token: Option<SecretString>,
        expires_at: Option<Instant>,
    ) {
        let mut state = self.state.write().await;
        state.auth = AuthState::SignedIn(identity);
        state.access_token = access_token;
        state.expires_at = expires_at;
    }

    pub async fn sign_out(&self) {
        let mut state = self.state.write().await;
        state.auth = AuthState::SignedOut;
        state.access_token = None;
        state.expires_at = None;
    }
}

/// All live sessions, keyed by the id stored in the browser cookie.
///
/// Entries are evicted after [`IDLE_TIMEOUT`] without a lookup and
/// [`MAX_LIFETIME`] after creation.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<SessionContext>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_expiry(IDLE_TIMEOUT, MAX_LIFETIME)
    }

    pub fn with_expiry(idle: Duration, lifetime: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .time_to_idle(idle)
                .time_to_live(lifetime)
                .build(),
        }
    }

    pub async fn create(&self) -> (Uuid, Arc<SessionContext>) {
        let id = Uuid::new_v4();
        let session = Arc::new(SessionContext::new());
        self.sessions.insert(id, session.clone()).await;
        debug!(session_id = %id, "session created");
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<SessionContext>> {
        self.sessions.get(&id).await
    }

    /// Look up a session from the raw cookie value.
    pub async fn get_by_cookie(&self, value: &str) -> Option<Arc<SessionContext>> {
        let id = Uuid::parse_str(value).ok()?;
        self.get(id).await
    }

    pub async fn remove(&self, id: Uuid) -> Option<Arc<SessionContext>> {
        let removed = self.sessions.remove(&id).await;
        if removed.is_some() {
            debug!(session_id = %id, "session removed");
        }
        removed
    }
}
