//! In-memory session controller.

use crate::{AuthError, AuthResult};
use parking_lot::RwLock;
use session_store::{Profile, Session, SessionStore};
use std::sync::Arc;

/// Single authoritative in-memory session for the running application.
///
/// Storage is touched only by `login`, `logout`, `refresh_profile`, and
/// `refresh_from_store`; everything else reads the in-memory snapshot.
/// Constructed once at process start and shared behind an `Arc`.
pub struct SessionManager {
    store: Arc<SessionStore>,
    current: RwLock<Session>,
}

impl SessionManager {
    /// Build a manager seeded from the persistent store.
    pub fn new(store: Arc<SessionStore>) -> AuthResult<Self> {
        let current = store.read()?;
        tracing::debug!(
            authenticated = current.is_authenticated(),
            "session seeded from store"
        );
        Ok(Self {
            store,
            current: RwLock::new(current),
        })
    }

    /// The persistent store this manager writes through.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Accept a credential and profile produced by the authentication
    /// backend.
    ///
    /// The payload is validated here, regardless of what HTTP status
    /// produced it: a missing or empty token, a missing profile, or a
    /// profile without an id is rejected and no state changes. On
    /// success the store is written first, then memory.
    pub fn login(&self, token: Option<String>, user: Option<Profile>) -> AuthResult<Session> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::InvalidResponse("missing access token")),
        };
        let user = user.ok_or(AuthError::InvalidResponse("missing user profile"))?;
        if user.id.is_none() {
            return Err(AuthError::InvalidResponse("user profile has no id"));
        }

        let session = Session::authenticated(token, user);
        self.store.write(&session)?;
        *self.current.write() = session.clone();
        tracing::info!(
            user_id = session.user_id(),
            role = %session.effective_role().unwrap_or_default(),
            "logged in"
        );
        Ok(session)
    }

    /// Clear the session. Idempotent: logging out of a logged-out
    /// session is a no-op, not an error.
    pub fn logout(&self) -> AuthResult<Session> {
        if !self.current.read().is_authenticated() {
            tracing::debug!("logout on an already logged-out session");
            return Ok(Session::anonymous());
        }
        self.store.clear()?;
        *self.current.write() = Session::anonymous();
        tracing::info!("logged out");
        Ok(Session::anonymous())
    }

    /// Snapshot of the in-memory session. Never blocks on storage.
    pub fn current(&self) -> Session {
        self.current.read().clone()
    }

    /// Re-read the persistent store and overwrite in-memory state
    /// wholesale. Last writer to the store wins; there is no merging.
    ///
    /// This is the republish path the sync watcher uses when another
    /// process changes the store.
    pub fn refresh_from_store(&self) -> AuthResult<Session> {
        let session = self.store.read()?;
        *self.current.write() = session.clone();
        Ok(session)
    }

    /// Replace the stored profile after an edit, keeping the token.
    ///
    /// The browser client rewrote its stored `user` record whenever a
    /// profile or resume save came back from the backend; this is the
    /// same refresh without a re-login.
    pub fn refresh_profile(&self, user: Profile) -> AuthResult<Session> {
        let token = self
            .current
            .read()
            .token()
            .map(str::to_string)
            .ok_or(AuthError::NotAuthenticated)?;

        let session = Session::authenticated(token, user);
        self.store.write(&session)?;
        *self.current.write() = session.clone();
        tracing::debug!(user_id = session.user_id(), "profile refreshed");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_store::{MemoryStore, Role};

    fn manager() -> SessionManager {
        let store = Arc::new(SessionStore::new(Box::new(MemoryStore::new())));
        SessionManager::new(store).unwrap()
    }

    #[test]
    fn test_new_seeds_from_store() {
        let store = Arc::new(SessionStore::new(Box::new(MemoryStore::new())));
        store
            .write(&Session::authenticated("tok", Profile::new(1, Role::User)))
            .unwrap();

        let manager = SessionManager::new(store).unwrap();
        assert_eq!(manager.current().token(), Some("tok"));
    }

    #[test]
    fn test_login_persists_and_updates_memory() {
        let manager = manager();

        let session = manager
            .login(Some("tok-1".into()), Some(Profile::new(1, Role::Employer)))
            .unwrap();

        assert_eq!(session.token(), Some("tok-1"));
        assert_eq!(manager.current(), session);
        assert_eq!(manager.store().read().unwrap(), session);
    }

    #[test]
    fn test_login_rejects_missing_token() {
        let manager = manager();

        let err = manager
            .login(None, Some(Profile::new(1, Role::User)))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
        assert!(!manager.current().is_authenticated());
    }

    #[test]
    fn test_login_rejects_empty_token() {
        let manager = manager();

        let err = manager
            .login(Some(String::new()), Some(Profile::new(1, Role::User)))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn test_login_rejects_missing_user() {
        let manager = manager();

        let err = manager.login(Some("tok".into()), None).unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn test_login_rejects_user_without_id() {
        let manager = manager();

        let user = Profile {
            id: None,
            ..Default::default()
        };
        let err = manager.login(Some("tok".into()), Some(user)).unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));

        // No state change: store and memory both stay logged out.
        assert!(!manager.current().is_authenticated());
        assert_eq!(manager.store().read().unwrap(), Session::anonymous());
    }

    #[test]
    fn test_logout_clears_store_and_memory() {
        let manager = manager();
        manager
            .login(Some("tok".into()), Some(Profile::new(1, Role::User)))
            .unwrap();

        manager.logout().unwrap();

        assert!(!manager.current().is_authenticated());
        assert_eq!(manager.store().read().unwrap(), Session::anonymous());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let manager = manager();
        manager
            .login(Some("tok".into()), Some(Profile::new(1, Role::User)))
            .unwrap();

        let first = manager.logout().unwrap();
        let second = manager.logout().unwrap();

        assert_eq!(first, Session::anonymous());
        assert_eq!(second, Session::anonymous());
    }

    #[test]
    fn test_logout_on_fresh_manager_is_noop() {
        let manager = manager();
        assert_eq!(manager.logout().unwrap(), Session::anonymous());
    }

    #[test]
    fn test_refresh_from_store_overwrites_memory() {
        let store = Arc::new(SessionStore::new(Box::new(MemoryStore::new())));
        let manager = SessionManager::new(store.clone()).unwrap();

        // Simulate an external write landing in shared storage.
        store
            .write(&Session::authenticated("tok-x", Profile::new(9, Role::User)))
            .unwrap();
        assert!(!manager.current().is_authenticated());

        let refreshed = manager.refresh_from_store().unwrap();
        assert_eq!(refreshed.token(), Some("tok-x"));
        assert_eq!(manager.current(), refreshed);
    }

    #[test]
    fn test_refresh_profile_keeps_token() {
        let manager = manager();
        manager
            .login(Some("tok".into()), Some(Profile::new(1, Role::User)))
            .unwrap();

        let mut updated = Profile::new(1, Role::User);
        updated.set_field("skills", "Rust, SQL");
        let session = manager.refresh_profile(updated).unwrap();

        assert_eq!(session.token(), Some("tok"));
        assert_eq!(
            manager.current().user().and_then(|u| u.field("skills").map(str::to_string)),
            Some("Rust, SQL".to_string())
        );
        assert_eq!(manager.store().read().unwrap(), session);
    }

    #[test]
    fn test_refresh_profile_requires_login() {
        let manager = manager();
        let err = manager.refresh_profile(Profile::new(1, Role::User)).unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
    }
}
