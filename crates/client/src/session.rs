//! Session state: who is logged in and which bearer token to send.
//!
//! [`SessionHandle`] is passed explicitly to everything that talks to the
//! backend. It is the only place the token is read or dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ads_core::EntityId;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Persisted credential: the logged-in user and their bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: EntityId,
    pub access_token: String,
}

/// Storage backend for the persisted session.
pub trait SessionStore: Send + Sync {
    /// Returns `Ok(None)` if nothing is stored.
    fn load(&self) -> ClientResult<Option<Session>>;

    fn save(&self, session: &Session) -> ClientResult<()>;

    fn clear(&self) -> ClientResult<()>;

    fn name(&self) -> &str {
        "unknown"
    }
}

/// JSON file on disk, e.g. `.ads-console/session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> ClientResult<Option<Session>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| {
            ClientError::Storage(format!("corrupt session file {}: {e}", self.path.display()))
        })
    }

    fn save(&self, session: &Session) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ClientResult<Option<Session>> {
        Ok(self.session.lock().clone())
    }

    fn save(&self, session: &Session) -> ClientResult<()> {
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.session.lock() = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Shared handle to the current session. Cheap to clone.
#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<dyn SessionStore>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    /// Wrap a store, loading whatever session it already holds.
    pub fn new(store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let current = store.load()?;
        debug!(store = store.name(), restored = current.is_some(), "Session handle ready");
        Ok(Self {
            store,
            current: Arc::new(RwLock::new(current)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemorySessionStore::new()),
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().clone()
    }

    /// Session guard: the credential, or `NotAuthenticated` when absent.
    pub fn require(&self) -> ClientResult<Session> {
        self.current().ok_or(ClientError::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Store the credential returned by a successful login.
    pub fn establish(&self, session: Session) -> ClientResult<()> {
        self.store.save(&session)?;
        *self.current.write() = Some(session);
        Ok(())
    }

    /// Drop the credential in memory and in the store.
    ///
    /// The in-memory copy is always cleared, even if the store fails.
    pub fn invalidate(&self) {
        self.current.write().take();
        if let Err(e) = self.store.clear() {
            warn!(store = self.store.name(), error = %e, "Failed to clear stored session");
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("store", &self.store.name())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user_id: 7,
            access_token: "tok_abc".to_string(),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FileSessionStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
    }

    #[test]
    fn test_handle_restores_and_invalidates() {
        let store = Arc::new(MemorySessionStore::new());
        store.save(&session()).unwrap();

        let handle = SessionHandle::new(store.clone()).unwrap();
        assert_eq!(handle.require().unwrap(), session());

        handle.invalidate();
        assert!(!handle.is_authenticated());
        assert!(matches!(handle.require(), Err(ClientError::NotAuthenticated)));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let handle = SessionHandle::in_memory();
        let other = handle.clone();
        handle.establish(session()).unwrap();
        assert_eq!(other.current(), Some(session()));
        other.invalidate();
        assert!(handle.current().is_none());
    }
}
