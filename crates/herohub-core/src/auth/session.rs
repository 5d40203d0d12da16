use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::models::{AuthTokens, User};
use crate::storage::{Storage, StorageError, TOKEN_KEY, USER_KEY};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to encode user record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Login payload rejected: {0}")]
    InvalidTokens(String),
}

/// Read-only view of the session handed to the rest of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    /// True until the first `hydrate` finishes
    pub is_loading: bool,
}

impl SessionSnapshot {
    fn loading() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    fn from_parts(auth: Option<(User, String)>, is_loading: bool) -> Self {
        match auth {
            Some((user, token)) => Self {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
                is_loading,
            },
            None => Self {
                user: None,
                token: None,
                is_authenticated: false,
                is_loading,
            },
        }
    }
}

/// Why a persisted session was thrown away during hydrate
#[derive(Debug)]
enum StoredSessionError {
    Read(StorageError),
    Corrupt(String),
}

/// Who is logged in, kept in memory and in durable storage.
///
/// The user and token are only ever set or cleared together. `hydrate`,
/// `login`, `logout` and `invalidate` are the only mutators and each holds
/// the write lock for its whole duration.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    state: watch::Sender<SessionSnapshot>,
    write_lock: Mutex<()>,
    ready: AtomicBool,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::loading());
        Self {
            storage,
            state,
            write_lock: Mutex::new(()),
            ready: AtomicBool::new(false),
        }
    }

    /// Load the session persisted by a previous run.
    ///
    /// Missing entries, an unreadable store, or a user record that fails the
    /// schema all produce an empty session and erase both entries.
    pub fn hydrate(&self) -> SessionSnapshot {
        let _guard = self.lock();

        let restored = match self.read_persisted() {
            Ok(Some(auth)) => {
                debug!(user_id = auth.0.id, "Session restored from storage");
                Some(auth)
            }
            Ok(None) => {
                debug!("No persisted session");
                self.clear_persisted();
                None
            }
            Err(StoredSessionError::Read(e)) => {
                warn!(error = %e, "Failed to read persisted session, starting signed out");
                self.clear_persisted();
                None
            }
            Err(StoredSessionError::Corrupt(reason)) => {
                warn!(reason = %reason, "Discarding invalid persisted session");
                self.clear_persisted();
                None
            }
        };

        self.ready.store(true, Ordering::SeqCst);
        self.publish(restored)
    }

    /// Replace the session with a fresh login.
    ///
    /// Both entries are persisted before the session is published. If either
    /// write fails the store is cleared and the error returned.
    pub fn login(&self, tokens: AuthTokens) -> Result<SessionSnapshot, SessionError> {
        let _guard = self.lock();

        if tokens.access_token.trim().is_empty() {
            return Err(SessionError::InvalidTokens("empty access token".to_string()));
        }
        if let Err(e) = tokens.user.validate() {
            return Err(SessionError::InvalidTokens(e.to_string()));
        }

        let user_json = serde_json::to_string(&tokens.user)?;
        let persisted = self
            .storage
            .set(USER_KEY, &user_json)
            .and_then(|_| self.storage.set(TOKEN_KEY, &tokens.access_token));

        if let Err(e) = persisted {
            warn!(error = %e, "Failed to persist session, clearing");
            self.clear_persisted();
            self.publish(None);
            return Err(e.into());
        }

        // A fresh login settles the session even if hydrate never ran
        self.ready.store(true, Ordering::SeqCst);
        info!(user_id = tokens.user.id, "Signed in");
        Ok(self.publish(Some((tokens.user, tokens.access_token))))
    }

    /// Sign out. Memory is always cleared; a storage failure is still reported.
    pub fn logout(&self) -> Result<(), SessionError> {
        let _guard = self.lock();
        self.publish(None);
        self.remove_persisted()?;
        info!("Signed out");
        Ok(())
    }

    /// Forced sign-out after the server rejected the token.
    pub fn invalidate(&self) {
        let _guard = self.lock();
        let was_authenticated = self.state.borrow().is_authenticated;
        self.publish(None);
        self.clear_persisted();
        warn!(was_authenticated, "Session invalidated by server");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Watch the session for changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// True once the first hydrate has finished
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// The durable store this session persists to
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, auth: Option<(User, String)>) -> SessionSnapshot {
        let snapshot = SessionSnapshot::from_parts(auth, !self.is_ready());
        self.state.send_replace(snapshot.clone());
        snapshot
    }

    fn read_persisted(&self) -> Result<Option<(User, String)>, StoredSessionError> {
        let token = self.storage.get(TOKEN_KEY).map_err(StoredSessionError::Read)?;
        let user_json = self.storage.get(USER_KEY).map_err(StoredSessionError::Read)?;

        let (token, user_json) = match (token, user_json) {
            (Some(token), Some(user_json)) if !token.trim().is_empty() => (token, user_json),
            (None, None) => return Ok(None),
            _ => {
                debug!("Persisted session is incomplete");
                return Ok(None);
            }
        };

        let user: User = serde_json::from_str(&user_json)
            .map_err(|e| StoredSessionError::Corrupt(format!("user record: {}", e)))?;
        user.validate()
            .map_err(|e| StoredSessionError::Corrupt(format!("user record: {}", e)))?;

        Ok(Some((user, token)))
    }

    fn remove_persisted(&self) -> Result<(), StorageError> {
        let token_result = self.storage.remove(TOKEN_KEY);
        let user_result = self.storage.remove(USER_KEY);
        token_result.and(user_result)
    }

    /// Best-effort erase used on fail-closed paths.
    fn clear_persisted(&self) {
        if let Err(e) = self.remove_persisted() {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::{sample_tokens, sample_user, FailingStorage};

    fn store_with(storage: Arc<dyn Storage>) -> SessionStore {
        SessionStore::new(storage)
    }

    #[test]
    fn test_starts_loading_until_hydrated() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        assert!(store.snapshot().is_loading);
        assert!(!store.is_ready());

        let snapshot = store.hydrate();
        assert!(!snapshot.is_loading);
        assert!(!snapshot.is_authenticated);
        assert!(store.is_ready());
    }

    #[test]
    fn test_login_before_hydrate_is_not_loading() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        let snapshot = store.login(sample_tokens("tok1", 1)).unwrap();

        assert!(snapshot.is_authenticated);
        assert!(!snapshot.is_loading);
        assert!(store.is_ready());
        assert_eq!(store.snapshot(), snapshot);
    }

    #[test]
    fn test_login_then_reload_restores_same_session() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));
        store.hydrate();
        let after_login = store.login(sample_tokens("tok1", 1)).unwrap();

        // Simulate a restart: a fresh store over the same storage
        let reloaded = store_with(storage);
        let restored = reloaded.hydrate();

        assert_eq!(restored, after_login);
        assert_eq!(restored.token.as_deref(), Some("tok1"));
        assert_eq!(restored.user.as_ref().map(|u| u.id), Some(1));
        assert!(restored.is_authenticated);
    }

    #[test]
    fn test_logout_then_reload_is_empty() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = store_with(Arc::clone(&storage));
        store.hydrate();
        store.login(sample_tokens("tok1", 1)).unwrap();
        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);

        let reloaded = store_with(storage);
        let restored = reloaded.hydrate();
        assert_eq!(restored.user, None);
        assert_eq!(restored.token, None);
        assert!(!restored.is_authenticated);
    }

    #[test]
    fn test_unparsable_user_clears_both_entries() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok1").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();

        let store = store_with(storage.clone());
        let snapshot = store.hydrate();

        assert!(!snapshot.is_authenticated);
        assert_eq!(snapshot.token, None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_user_failing_schema_clears_both_entries() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok1").unwrap();
        // Valid JSON, wrong shape
        storage.set(USER_KEY, r#"{"id":1,"email":"a@b.com"}"#).unwrap();

        let snapshot = store_with(storage.clone()).hydrate();
        assert!(!snapshot.is_authenticated);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_token_without_user_is_erased() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok1").unwrap();

        let snapshot = store_with(storage.clone()).hydrate();
        assert!(!snapshot.is_authenticated);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_user_without_token_is_erased() {
        let storage = Arc::new(MemoryStorage::new());
        let user_json = serde_json::to_string(&sample_user(1)).unwrap();
        storage.set(USER_KEY, &user_json).unwrap();

        let snapshot = store_with(storage.clone()).hydrate();
        assert!(!snapshot.is_authenticated);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_login_failure_leaves_no_partial_state() {
        let storage = Arc::new(FailingStorage::failing_set(TOKEN_KEY));
        let store = store_with(storage.clone());
        store.hydrate();

        let result = store.login(sample_tokens("tok1", 1));
        assert!(matches!(result, Err(SessionError::Storage(_))));
        assert!(!store.is_authenticated());
        assert_eq!(storage.inner().get(USER_KEY).unwrap(), None);
        assert_eq!(storage.inner().get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_login_rejects_empty_token() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        store.hydrate();
        let result = store.login(sample_tokens("  ", 1));
        assert!(matches!(result, Err(SessionError::InvalidTokens(_))));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_read_failure_fails_closed() {
        let storage = Arc::new(FailingStorage::failing_get(USER_KEY));
        storage.inner().set(TOKEN_KEY, "tok1").unwrap();

        let store = store_with(storage.clone());
        let snapshot = store.hydrate();
        assert!(!snapshot.is_authenticated);
        assert!(store.is_ready());
        assert_eq!(storage.inner().get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_invalidate_clears_memory_and_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_with(storage.clone());
        store.hydrate();
        store.login(sample_tokens("tok1", 1)).unwrap();

        store.invalidate();
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_subscribers_see_login_and_logout() {
        let store = store_with(Arc::new(MemoryStorage::new()));
        store.hydrate();
        let mut rx = store.subscribe();

        store.login(sample_tokens("tok1", 1)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated);

        store.logout().unwrap();
        assert!(!rx.borrow_and_update().is_authenticated);
    }
}
