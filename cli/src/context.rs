//! Shared application context.

use anyhow::Result;
use api_client::ApiClient;
use auth_session::SessionManager;
use client_config::{Config, Paths};
use session_store::{FileStore, Session, SessionStore};
use std::sync::Arc;

/// Everything a screen needs: configuration, the backend client, and
/// the session controller. Built once at startup and borrowed by every
/// command.
pub struct AppContext {
    pub config: Config,
    pub api: ApiClient,
    pub manager: Arc<SessionManager>,
}

impl AppContext {
    /// Wire the context together from configuration and paths.
    pub fn build(config: Config, paths: &Paths) -> Result<Self> {
        paths.ensure_dirs()?;
        let store = Arc::new(SessionStore::new(Box::new(FileStore::new(
            paths.session_file(),
        ))));
        let manager = Arc::new(SessionManager::new(store)?);
        let api = ApiClient::new(&config.api_url);
        Ok(Self {
            config,
            api,
            manager,
        })
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.manager.current()
    }
}
