//! Application shell: composition root, routes and the session route gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` wires durable storage, the API gateway and the session store
//! together. Nothing is a process-wide singleton; every collaborator is
//! passed in, so tests can swap storage and navigation freely.
//!
//! ROUTE GATE
//! ==========
//! Until rehydration has finished no route tree is selectable. Afterwards
//! unauthenticated sessions only reach the login page and authenticated
//! sessions never see it.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::AdminConfig;
use crate::net::{ApiClient, ApiError};
use crate::state::session::{SessionCell, SessionPhase, SessionStore, SessionTeardown};
use crate::state::storage::{DurableStorage, SessionStorage};

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Users,
    Products,
    Policies,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/",
            Self::Users => "/users",
            Self::Products => "/products",
            Self::Policies => "/policies",
        }
    }
}

/// Which set of routes the shell may currently render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteTree {
    /// Rehydration still running; render a spinner.
    Loading,
    Public,
    Protected,
}

impl RouteTree {
    #[must_use]
    pub fn select(initialized: bool, authenticated: bool) -> Self {
        match (initialized, authenticated) {
            (false, _) => Self::Loading,
            (true, false) => Self::Public,
            (true, true) => Self::Protected,
        }
    }

    /// Resolve a requested path, applying the tree's redirects.
    #[must_use]
    pub fn resolve(self, path: &str) -> Option<Route> {
        let path = normalize_path(path);
        match self {
            Self::Loading => None,
            Self::Public => Some(Route::Login),
            Self::Protected => Some(match path {
                "/users" => Route::Users,
                "/products" => Route::Products,
                "/policies" => Route::Policies,
                _ => Route::Dashboard,
            }),
        }
    }
}

fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Hard navigation performed by global handlers such as the 401 teardown.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every navigation; the shell reads the last one.
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).last().copied()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<Route> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        tracing::debug!(path = route.path(), "navigate");
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(route);
    }
}

// =============================================================================
// APP
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to build API client: {0}")]
    Client(#[from] ApiError),
}

/// The wired-up application core.
pub struct App {
    client: Arc<ApiClient>,
    session: SessionStore,
    navigator: Arc<History>,
}

impl App {
    /// Wire storage, gateway and session store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AdminConfig, storage: Arc<dyn DurableStorage>, navigator: Arc<History>) -> Result<Self, AppError> {
        let storage = SessionStorage::new(storage);
        let cell = Arc::new(SessionCell::default());
        let teardown = SessionTeardown::new(storage.clone(), cell.clone(), navigator.clone());
        let client = ApiClient::new(
            &config.api_url,
            config.timeout,
            Arc::new(storage.clone()),
            Arc::new(teardown),
        )?
        .with_fallback(config.fallback_mode());
        let client = Arc::new(client);
        let session = SessionStore::new(client.clone(), storage, cell);
        Ok(Self { client, session, navigator })
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.navigator
    }

    /// Run rehydration and report the tree the shell may now render.
    pub async fn start(&self) -> RouteTree {
        let phase = self.session.rehydrate().await;
        tracing::info!(?phase, "session initialized");
        self.route_tree()
    }

    #[must_use]
    pub fn route_tree(&self) -> RouteTree {
        let session = self.session.snapshot();
        RouteTree::select(session.is_initialized(), session.is_authenticated())
    }

    /// Resolve `path` against the current tree and record the navigation.
    pub fn open(&self, path: &str) -> Option<Route> {
        let route = self.route_tree().resolve(path)?;
        self.navigator.navigate(route);
        Some(route)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.snapshot().phase
    }
}
