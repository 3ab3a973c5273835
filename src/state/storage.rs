//! Durable key/value storage for the session projection.
//!
//! DESIGN
//! ======
//! Storage outlives the in-memory session: it survives restarts and is the
//! only rehydration source. Writes are synchronous; there is no ordering
//! guarantee between processes sharing the same file.
//!
//! Layout is two string entries: `token` holds the raw bearer token and
//! `user` holds the JSON-serialized [`User`].

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::net::client::TokenSource;
use crate::net::types::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage JSON failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal string key/value store, modeled on browser local storage.
pub trait DurableStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the value cannot be written durably.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns an error if the removal cannot be written durably.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// Process-local storage, used by tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored key, for assertions.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// Storage persisted as one JSON object in a file, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// A file that does not parse is treated as empty and overwritten on the
    /// next write; a session that cannot be read is no session.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "storage file does not parse; starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io { path: parent.to_path_buf(), source })?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw).map_err(|source| StorageError::Io { path: self.path.clone(), source })
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&entries)
    }
}

// =============================================================================
// SESSION STORAGE
// =============================================================================

/// What rehydration finds in storage.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredSession {
    /// Nothing usable: one or both entries missing or empty.
    Empty,
    /// Both entries present and the user decodes.
    Found { token: String, user: User },
    /// Both entries present but the user record does not decode.
    Unreadable { token: String },
}

/// Typed view over the two session entries of a [`DurableStorage`].
#[derive(Clone)]
pub struct SessionStorage {
    inner: Arc<dyn DurableStorage>,
}

impl SessionStorage {
    #[must_use]
    pub fn new(inner: Arc<dyn DurableStorage>) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn load(&self) -> StoredSession {
        let token = self.token();
        let raw_user = self.inner.get(USER_KEY).filter(|u| !u.is_empty());
        let (Some(token), Some(raw_user)) = (token, raw_user) else {
            return StoredSession::Empty;
        };
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => StoredSession::Found { token, user },
            Err(e) => {
                tracing::warn!(error = %e, "stored user record does not decode");
                StoredSession::Unreadable { token }
            }
        }
    }

    /// Write token then user.
    ///
    /// # Errors
    ///
    /// Returns the first storage failure; the token may already be written.
    pub fn save(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let raw_user = serde_json::to_string(user)?;
        self.inner.set(TOKEN_KEY, token)?;
        self.inner.set(USER_KEY, &raw_user)
    }

    /// Replace the cached user, leaving the token alone.
    ///
    /// # Errors
    ///
    /// Returns the storage failure, if any.
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let raw_user = serde_json::to_string(user)?;
        self.inner.set(USER_KEY, &raw_user)
    }

    /// Remove both entries. Both removals are attempted even if one fails.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.inner.remove(TOKEN_KEY);
        let user = self.inner.remove(USER_KEY);
        token.and(user)
    }
}

impl TokenSource for SessionStorage {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}
