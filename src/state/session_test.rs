use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::*;
use crate::app::History;
use crate::net::types::{LoginResponse, Role};
use crate::state::storage::{DurableStorage, MemoryStorage, TOKEN_KEY, USER_KEY};

fn make_user(name: &str) -> User {
    User {
        id: "u-1".to_owned(),
        name: name.to_owned(),
        phone_number: "+254700123456".to_owned(),
        national_id: "12345678".to_owned(),
        email: None,
        role: Role::Admin,
        is_active: true,
        created_at: "2024-01-01T00:00:00Z".to_owned(),
        updated_at: "2024-01-01T00:00:00Z".to_owned(),
    }
}

fn credentials() -> LoginRequest {
    LoginRequest { phone_number: "+254700123456".to_owned(), password: "secret".to_owned() }
}

fn login_ok(token: &str) -> Result<LoginResponse, ApiError> {
    Ok(LoginResponse { message: "Login successful".to_owned(), token: token.to_owned(), user: make_user("Amina Wanjiru") })
}

/// Auth backend answering from a script and counting calls.
struct ScriptedAuth {
    login: StdMutex<Result<LoginResponse, ApiError>>,
    logout: StdMutex<Result<(), ApiError>>,
    verify: StdMutex<Result<User, ApiError>>,
    login_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    observe: StdMutex<Option<Arc<SessionCell>>>,
    loading_seen: AtomicBool,
    last_login: StdMutex<Option<LoginRequest>>,
    /// Fired from inside `verify`, as a concurrent 401 would.
    teardown_during_verify: StdMutex<Option<Arc<SessionTeardown>>>,
}

impl ScriptedAuth {
    fn new() -> Self {
        Self {
            login: StdMutex::new(login_ok("abc123")),
            logout: StdMutex::new(Ok(())),
            verify: StdMutex::new(Ok(make_user("Amina Wanjiru"))),
            login_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            observe: StdMutex::new(None),
            loading_seen: AtomicBool::new(false),
            last_login: StdMutex::new(None),
            teardown_during_verify: StdMutex::new(None),
        }
    }

    fn with_login(self, result: Result<LoginResponse, ApiError>) -> Self {
        *self.login.lock().unwrap() = result;
        self
    }

    fn with_logout(self, result: Result<(), ApiError>) -> Self {
        *self.logout.lock().unwrap() = result;
        self
    }

    fn with_verify(self, result: Result<User, ApiError>) -> Self {
        *self.verify.lock().unwrap() = result;
        self
    }
}

#[async_trait::async_trait]
impl AuthBackend for ScriptedAuth {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_login.lock().unwrap() = Some(credentials.clone());
        if let Some(cell) = self.observe.lock().unwrap().as_ref() {
            self.loading_seen.store(cell.snapshot().is_loading, Ordering::SeqCst);
        }
        tokio::task::yield_now().await;
        self.login.lock().unwrap().clone()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout.lock().unwrap().clone()
    }

    async fn verify(&self) -> Result<User, ApiError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let teardown = self.teardown_during_verify.lock().unwrap().clone();
        if let Some(teardown) = teardown {
            teardown.on_unauthorized();
        }
        self.verify.lock().unwrap().clone()
    }
}

struct Harness {
    backend: Arc<ScriptedAuth>,
    memory: Arc<MemoryStorage>,
    storage: SessionStorage,
    cell: Arc<SessionCell>,
    store: SessionStore,
}

fn harness(backend: ScriptedAuth) -> Harness {
    let backend = Arc::new(backend);
    let memory = Arc::new(MemoryStorage::new());
    let storage = SessionStorage::new(memory.clone());
    let cell = Arc::new(SessionCell::default());
    let store = SessionStore::new(backend.clone(), storage.clone(), cell.clone());
    Harness { backend, memory, storage, cell, store }
}

fn seed_storage(memory: &MemoryStorage, token: &str, user: &str) {
    memory.set(TOKEN_KEY, token).unwrap();
    memory.set(USER_KEY, user).unwrap();
}

// =============================================================================
// derived authentication
// =============================================================================

#[test]
fn authenticated_requires_phase_user_and_token() {
    let mut session = Session {
        user: Some(make_user("A")),
        token: Some("t".to_owned()),
        is_loading: false,
        phase: SessionPhase::Authenticated,
    };
    assert!(session.is_authenticated());

    session.token = Some(String::new());
    assert!(!session.is_authenticated());

    session.token = Some("t".to_owned());
    session.phase = SessionPhase::Initializing;
    assert!(!session.is_authenticated());
}

#[test]
fn set_token_does_not_authenticate() {
    let h = harness(ScriptedAuth::new());
    h.store.set_user(make_user("A"));
    h.store.set_token("abc123".to_owned());
    assert!(!h.store.is_authenticated());
    assert_eq!(h.store.snapshot().token.as_deref(), Some("abc123"));
}

#[test]
fn set_loading_toggles_flag() {
    let h = harness(ScriptedAuth::new());
    h.store.set_loading(true);
    assert!(h.store.snapshot().is_loading);
    h.store.set_loading(false);
    assert!(!h.store.snapshot().is_loading);
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_persists_and_authenticates() {
    let h = harness(ScriptedAuth::new());
    *h.backend.observe.lock().unwrap() = Some(h.cell.clone());

    let user = h.store.login(&credentials()).await.unwrap();
    assert_eq!(user.name, "Amina Wanjiru");

    let session = h.store.snapshot();
    assert!(session.is_authenticated());
    assert!(!session.is_loading);
    assert_eq!(session.token.as_deref(), Some("abc123"));
    assert!(h.backend.loading_seen.load(Ordering::SeqCst));

    assert_eq!(h.memory.get(TOKEN_KEY).as_deref(), Some("abc123"));
    let stored: User = serde_json::from_str(&h.memory.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored, user);
}

#[tokio::test]
async fn login_with_known_credentials_stores_issued_token() {
    let h = harness(ScriptedAuth::new());
    let request = LoginRequest { phone_number: "+254700123456".to_owned(), password: "password".to_owned() };

    h.store.login(&request).await.unwrap();

    assert_eq!(h.backend.last_login.lock().unwrap().as_ref(), Some(&request));
    assert!(h.store.is_authenticated());
    assert_eq!(h.store.snapshot().token.as_deref(), Some("abc123"));
    assert_eq!(h.memory.get(TOKEN_KEY).as_deref(), Some("abc123"));
}

#[tokio::test]
async fn login_failure_keeps_previous_state() {
    let h = harness(ScriptedAuth::new().with_login(Err(ApiError::Unauthorized { message: "Invalid credentials".to_owned() })));
    h.store.rehydrate().await;

    let error = h.store.login(&credentials()).await.unwrap_err();
    assert_eq!(error.user_message(), "Invalid credentials");

    let session = h.store.snapshot();
    assert_eq!(session.phase, SessionPhase::Unauthenticated);
    assert!(!session.is_loading);
    assert!(h.memory.keys().is_empty());
}

#[tokio::test]
async fn login_with_empty_token_is_rejected() {
    let h = harness(ScriptedAuth::new().with_login(login_ok("")));

    let error = h.store.login(&credentials()).await.unwrap_err();
    assert!(matches!(error, SessionError::EmptyToken));
    assert!(!h.store.is_authenticated());
    assert!(h.memory.keys().is_empty());
}

#[tokio::test]
async fn unreachable_server_message_is_friendly() {
    let h = harness(ScriptedAuth::new().with_login(Err(ApiError::Network("refused".to_owned()))));
    let error = h.store.login(&credentials()).await.unwrap_err();
    assert_eq!(error.user_message(), ApiError::Timeout.user_message());
}

// =============================================================================
// logout
// =============================================================================

#[tokio::test]
async fn logout_clears_everything() {
    let h = harness(ScriptedAuth::new());
    h.store.login(&credentials()).await.unwrap();

    h.store.logout().await;

    let session = h.store.snapshot();
    assert_eq!(session, Session { phase: SessionPhase::Unauthenticated, ..Session::default() });
    assert!(h.memory.keys().is_empty());
    assert_eq!(h.backend.logout_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn logout_succeeds_locally_when_remote_fails() {
    let h = harness(ScriptedAuth::new().with_logout(Err(ApiError::Server { status: 500, message: "down".to_owned() })));
    h.store.login(&credentials()).await.unwrap();

    h.store.logout().await;

    assert!(!h.store.is_authenticated());
    assert!(h.storage.token().is_none());
}

// =============================================================================
// rehydration
// =============================================================================

#[tokio::test]
async fn rehydrate_without_storage_is_unauthenticated() {
    let h = harness(ScriptedAuth::new());

    assert_eq!(h.store.rehydrate().await, SessionPhase::Unauthenticated);
    assert!(h.store.is_initialized());
    assert_eq!(h.backend.verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rehydrate_with_only_a_token_is_unauthenticated() {
    let h = harness(ScriptedAuth::new());
    h.memory.set(TOKEN_KEY, "abc123").unwrap();

    assert_eq!(h.store.rehydrate().await, SessionPhase::Unauthenticated);
    assert_eq!(h.backend.verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rehydrate_verifies_and_refreshes_user() {
    let h = harness(ScriptedAuth::new().with_verify(Ok(make_user("Amina W. (renamed)"))));
    let cached = serde_json::to_string(&make_user("Amina Wanjiru")).unwrap();
    seed_storage(&h.memory, "abc123", &cached);

    assert_eq!(h.store.rehydrate().await, SessionPhase::Authenticated);

    let session = h.store.snapshot();
    assert!(session.is_authenticated());
    assert_eq!(session.user.unwrap().name, "Amina W. (renamed)");
    let stored: User = serde_json::from_str(&h.memory.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored.name, "Amina W. (renamed)");
}

#[tokio::test]
async fn rehydrate_failed_verification_logs_out() {
    let h = harness(ScriptedAuth::new().with_verify(Err(ApiError::Unauthorized { message: "expired".to_owned() })));
    let cached = serde_json::to_string(&make_user("Amina Wanjiru")).unwrap();
    seed_storage(&h.memory, "stale", &cached);

    assert_eq!(h.store.rehydrate().await, SessionPhase::Unauthenticated);
    assert!(h.memory.keys().is_empty());
    assert_eq!(h.backend.logout_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.snapshot().token, None);
}

#[tokio::test]
async fn rehydrate_unreadable_user_logs_out() {
    let h = harness(ScriptedAuth::new());
    seed_storage(&h.memory, "abc123", "{not json");

    assert_eq!(h.store.rehydrate().await, SessionPhase::Unauthenticated);
    assert!(h.memory.keys().is_empty());
    assert_eq!(h.backend.verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unauthorized_during_verification_wins() {
    let h = harness(ScriptedAuth::new());
    let cached = serde_json::to_string(&make_user("Amina Wanjiru")).unwrap();
    seed_storage(&h.memory, "abc123", &cached);
    let history = Arc::new(History::new());
    let teardown = Arc::new(SessionTeardown::new(h.storage.clone(), h.cell.clone(), history.clone()));
    *h.backend.teardown_during_verify.lock().unwrap() = Some(teardown);

    assert_eq!(h.store.rehydrate().await, SessionPhase::Unauthenticated);

    let session = h.store.snapshot();
    assert!(!session.is_authenticated());
    assert_eq!(session.user, None);
    assert_eq!(session.token, None);
    assert!(h.memory.keys().is_empty());
    assert_eq!(history.current(), Some(Route::Login));
}

#[tokio::test]
async fn rehydrate_runs_once() {
    let h = harness(ScriptedAuth::new());
    let cached = serde_json::to_string(&make_user("Amina Wanjiru")).unwrap();
    seed_storage(&h.memory, "abc123", &cached);

    assert_eq!(h.store.rehydrate().await, SessionPhase::Authenticated);
    h.store.logout().await;
    assert_eq!(h.store.rehydrate().await, SessionPhase::Unauthenticated);
    assert_eq!(h.backend.verify_calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// 401 teardown
// =============================================================================

#[tokio::test]
async fn teardown_clears_session_and_navigates_to_login() {
    let h = harness(ScriptedAuth::new());
    h.store.login(&credentials()).await.unwrap();
    let history = Arc::new(History::new());
    let teardown = SessionTeardown::new(h.storage.clone(), h.cell.clone(), history.clone());

    teardown.on_unauthorized();

    assert!(!h.store.is_authenticated());
    assert_eq!(h.store.snapshot().phase, SessionPhase::Unauthenticated);
    assert!(h.memory.keys().is_empty());
    assert_eq!(history.current(), Some(Route::Login));
}

#[test]
fn teardown_before_initialization_keeps_phase() {
    let h = harness(ScriptedAuth::new());
    h.store.set_token("abc123".to_owned());
    let history = Arc::new(History::new());
    let teardown = SessionTeardown::new(h.storage.clone(), h.cell.clone(), history.clone());

    teardown.on_unauthorized();

    let session = h.store.snapshot();
    assert_eq!(session.phase, SessionPhase::Uninitialized);
    assert_eq!(session.token, None);
    assert_eq!(history.entries(), vec![Route::Login]);
}

// =============================================================================
// serialization of lifecycle operations
// =============================================================================

#[tokio::test]
async fn concurrent_login_and_logout_leave_consistent_state() {
    let h = harness(ScriptedAuth::new());

    let credentials = credentials();
    let (login, ()) = tokio::join!(h.store.login(&credentials), h.store.logout());
    assert!(login.is_ok());

    let session = h.store.snapshot();
    assert_eq!(session.is_authenticated(), h.storage.token().is_some());
    assert!(!session.is_loading);
}

#[tokio::test]
async fn double_login_is_serialized() {
    let h = harness(ScriptedAuth::new());

    let credentials = credentials();
    let (first, second) = tokio::join!(h.store.login(&credentials), h.store.login(&credentials));
    assert!(first.is_ok() && second.is_ok());
    assert_eq!(h.backend.login_calls.load(Ordering::SeqCst), 2);
    assert!(h.store.is_authenticated());
    assert_eq!(h.storage.token().as_deref(), Some("abc123"));
}
