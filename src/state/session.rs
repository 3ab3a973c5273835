//! Session lifecycle: login, logout, rehydration and 401 teardown.
//!
//! ARCHITECTURE
//! ============
//! In-memory state lives in a shared [`SessionCell`]. Two parties mutate it:
//!
//! - [`SessionStore`], which runs the login/logout/rehydrate sequences. These
//!   are serialized behind one async mutex so overlapping calls (a double
//!   click, a logout racing a login) apply one after another.
//! - [`SessionTeardown`], the gateway's 401 handler. It runs inside a request
//!   and therefore never waits on the store's mutex.
//!
//! STATE MACHINE
//! =============
//! `Uninitialized -> Initializing -> {Authenticated, Unauthenticated}`, and
//! `Authenticated -> Unauthenticated` on logout, failed verification or any
//! 401. Nothing returns to `Initializing`.
//!
//! Authentication is derived, never set directly: the session counts as
//! authenticated only in the `Authenticated` phase with a non-empty token and
//! a user. Seeding a token from storage does not authenticate; only a
//! successful login or verification does.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use crate::app::{Navigator, Route};
use crate::net::auth::AuthBackend;
use crate::net::client::UnauthorizedHandler;
use crate::net::error::ApiError;
use crate::net::types::{LoginRequest, User};

use super::storage::{SessionStorage, StorageError, StoredSession};

// =============================================================================
// SESSION
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Initializing,
    Authenticated,
    Unauthenticated,
}

/// Snapshot of the client's authentication state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
    pub phase: SessionPhase,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
            && self.user.is_some()
            && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// True once rehydration has settled on an outcome.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        matches!(self.phase, SessionPhase::Authenticated | SessionPhase::Unauthenticated)
    }

    fn sign_out(&mut self) {
        self.user = None;
        self.token = None;
        self.is_loading = false;
        self.phase = SessionPhase::Unauthenticated;
    }

    /// Drop credentials without settling an unfinished rehydration.
    fn revoke(&mut self) {
        if self.is_initialized() {
            self.sign_out();
        } else {
            self.user = None;
            self.token = None;
            self.is_loading = false;
        }
    }
}

/// Shared in-memory session. Locks are never held across an await.
#[derive(Debug, Default)]
pub struct SessionCell {
    inner: RwLock<Session>,
}

impl SessionCell {
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update(&self, apply: impl FnOnce(&mut Session)) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut session);
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("login response carried an empty token")]
    EmptyToken,

    #[error("failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Message shown on the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Unauthorized { message } | ApiError::Rejected { message, .. }) => message.clone(),
            Self::Api(other) => other.user_message(),
            Self::EmptyToken | Self::Storage(_) => "Login failed".to_owned(),
        }
    }
}

// =============================================================================
// 401 TEARDOWN
// =============================================================================

/// Gateway handler for authorization-denied responses.
///
/// Clears durable storage, drops the in-memory credentials and forces a
/// navigation to the login route.
pub struct SessionTeardown {
    storage: SessionStorage,
    cell: Arc<SessionCell>,
    navigator: Arc<dyn Navigator>,
}

impl SessionTeardown {
    #[must_use]
    pub fn new(storage: SessionStorage, cell: Arc<SessionCell>, navigator: Arc<dyn Navigator>) -> Self {
        Self { storage, cell, navigator }
    }
}

impl UnauthorizedHandler for SessionTeardown {
    fn on_unauthorized(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to clear stored session after 401");
        }
        self.cell.update(Session::revoke);
        self.navigator.navigate(Route::Login);
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Owner of the session lifecycle operations.
pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    storage: SessionStorage,
    cell: Arc<SessionCell>,
    ops: Mutex<()>,
}

impl SessionStore {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, storage: SessionStorage, cell: Arc<SessionCell>) -> Self {
        Self { backend, storage, cell, ops: Mutex::new(()) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.cell.snapshot()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.cell.snapshot().is_authenticated()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.snapshot().is_initialized()
    }

    /// Authenticate with the remote system and persist the credential.
    ///
    /// On failure the previous authentication state is left as it was, apart
    /// from the loading flag. The gateway's 401 teardown still applies if the
    /// server answers 401.
    ///
    /// # Errors
    ///
    /// Returns the API failure, [`SessionError::EmptyToken`] for a response
    /// without a usable token, or the storage failure if persisting fails.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, SessionError> {
        let _guard = self.ops.lock().await;
        self.cell.update(|s| s.is_loading = true);

        let response = match self.backend.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.cell.update(|s| s.is_loading = false);
                return Err(e.into());
            }
        };

        if response.token.is_empty() {
            self.cell.update(|s| s.is_loading = false);
            return Err(SessionError::EmptyToken);
        }

        if let Err(e) = self.storage.save(&response.token, &response.user) {
            if let Err(clear) = self.storage.clear() {
                tracing::warn!(error = %clear, "failed to roll back partial session write");
            }
            self.cell.update(|s| s.is_loading = false);
            return Err(e.into());
        }

        let user = response.user;
        let token = response.token;
        self.cell.update(|s| {
            s.user = Some(user.clone());
            s.token = Some(token);
            s.is_loading = false;
            s.phase = SessionPhase::Authenticated;
        });
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "login succeeded");
        Ok(user)
    }

    /// Sign out. Always succeeds locally, whatever the remote system says.
    pub async fn logout(&self) {
        let _guard = self.ops.lock().await;
        self.logout_locked().await;
    }

    async fn logout_locked(&self) {
        if let Err(e) = self.backend.logout().await {
            tracing::warn!(error = %e, "remote logout failed; clearing local session anyway");
        }
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
        self.cell.update(Session::sign_out);
        tracing::info!("logged out");
    }

    /// Seed the cached user. Does not change the phase.
    pub fn set_user(&self, user: User) {
        self.cell.update(|s| s.user = Some(user));
    }

    /// Seed the bearer token. Does not authenticate the session on its own.
    pub fn set_token(&self, token: String) {
        self.cell.update(|s| s.token = Some(token));
    }

    pub fn set_loading(&self, loading: bool) {
        self.cell.update(|s| s.is_loading = loading);
    }

    /// Restore the session from durable storage and verify it remotely.
    ///
    /// Runs at most once; later calls return the current phase unchanged.
    pub async fn rehydrate(&self) -> SessionPhase {
        let _guard = self.ops.lock().await;
        let current = self.cell.snapshot().phase;
        if current != SessionPhase::Uninitialized {
            return current;
        }
        self.cell.update(|s| s.phase = SessionPhase::Initializing);

        match self.storage.load() {
            StoredSession::Empty => {
                tracing::info!("no stored session");
                self.cell.update(Session::sign_out);
            }
            StoredSession::Unreadable { token } => {
                self.set_token(token);
                self.logout_locked().await;
            }
            StoredSession::Found { token, user } => {
                self.set_token(token);
                self.set_user(user);
                self.verify_locked().await;
            }
        }

        self.cell.snapshot().phase
    }

    async fn verify_locked(&self) {
        match self.backend.verify().await {
            Ok(user) => {
                // A 401 teardown may have landed while verify was in flight.
                if self.cell.snapshot().token.is_none() {
                    tracing::warn!("session revoked during verification");
                    self.cell.update(Session::sign_out);
                    return;
                }
                if let Err(e) = self.storage.save_user(&user) {
                    tracing::warn!(error = %e, "failed to refresh stored user");
                }
                tracing::info!(user_id = %user.id, "stored session verified");
                self.cell.update(|s| {
                    s.user = Some(user);
                    s.phase = SessionPhase::Authenticated;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "token verification failed");
                self.logout_locked().await;
            }
        }
    }
}
