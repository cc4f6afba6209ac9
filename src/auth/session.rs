//! Session management for the signed-in user.
//!
//! The session (bearer token + user record) is an injected capability rather
//! than a global: it is initialized on login and torn down on logout or when
//! the server answers 401.

use crate::models::User;
use crate::types::ApiError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Token and user persisted after a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Client-local session storage
pub trait SessionStore: Send + Sync {
    /// Current session, if any
    fn load(&self) -> Option<Session>;

    /// Initializes the session after login
    fn save(&self, session: Session) -> Result<(), ApiError>;

    /// Tears the session down
    fn clear(&self) -> Result<(), ApiError>;

    fn token(&self) -> Option<String> {
        self.load().map(|s| s.token)
    }

    fn is_authenticated(&self) -> bool {
        self.load().is_some()
    }
}

/// Session kept in memory only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.session.read().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, session: Session) -> Result<(), ApiError> {
        let mut guard = self.session.write().map_err(|e| ApiError::Session(e.to_string()))?;
        *guard = Some(session);
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        let mut guard = self.session.write().map_err(|e| ApiError::Session(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Session persisted as JSON in a file, cached in memory
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    cache: MemorySessionStore,
}

impl FileSessionStore {
    /// Opens the store, reading any session left by a previous run
    ///
    /// A missing file means "signed out". A corrupt file is discarded so the
    /// user can log in again.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let path = path.into();
        let cache = MemorySessionStore::new();

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Session>(&contents) {
                Ok(session) => cache.save(session)?,
                Err(e) => {
                    log::warn!("Discarding unreadable session file {}: {}", path.display(), e);
                    remove_if_exists(&path)?;
                },
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {},
            Err(e) => return Err(ApiError::Session(e.to_string())),
        }

        Ok(Self {
            path,
            cache,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        self.cache.load()
    }

    fn save(&self, session: Session) -> Result<(), ApiError> {
        let json = serde_json::to_string_pretty(&session)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ApiError::Session(e.to_string()))?;
        }
        fs::write(&self.path, json).map_err(|e| ApiError::Session(e.to_string()))?;
        self.cache.save(session)
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.cache.clear()?;
        remove_if_exists(&self.path)
    }
}

fn remove_if_exists(path: &Path) -> Result<(), ApiError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ApiError::Session(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::TempDir;

    fn sample_session() -> Session {
        Session {
            token: "token-123".to_string(),
            user: User {
                id: 1,
                username: "sv001".to_string(),
                role: Role::Student,
                ma_sinh_vien: Some("SV001".to_string()),
                ho_ten: None,
                email: None,
            },
        }
    }

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(!store.is_authenticated());

        store.save(sample_session()).unwrap();
        assert_eq!(store.token().as_deref(), Some("token-123"));

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        assert!(!store.is_authenticated());
        store.save(sample_session()).unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.load(), Some(sample_session()));

        reopened.clear().unwrap();
        assert!(!path.exists());
        assert!(!reopened.is_authenticated());
    }

    #[test]
    fn test_file_store_discards_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_clear_without_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(dir.path().join("missing.json")).unwrap();
        assert!(store.clear().is_ok());
    }
}
