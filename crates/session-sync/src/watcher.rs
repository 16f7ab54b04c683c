//! Store watcher task.

use auth_session::SessionManager;
use session_store::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How often the watcher checks the store for external changes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Watches the persistent session store for changes made by other
/// processes and republishes them into the `SessionManager`.
///
/// Registered once at process start; dropping the watcher aborts the
/// task, so the registration cannot outlive the application. Changes
/// written through this process's own store handle are suppressed
/// (the controller already applied them), which is verified by test
/// rather than assumed.
pub struct StoreWatcher {
    handle: JoinHandle<()>,
    receiver: watch::Receiver<Session>,
}

impl StoreWatcher {
    /// Spawn the watcher with the default poll interval.
    pub fn spawn(manager: Arc<SessionManager>) -> Self {
        Self::spawn_with_interval(manager, DEFAULT_POLL_INTERVAL)
    }

    /// Spawn the watcher with a custom poll interval.
    pub fn spawn_with_interval(manager: Arc<SessionManager>, poll_interval: Duration) -> Self {
        let (tx, rx) = watch::channel(manager.current());
        // Baseline is taken here, at registration time, so anything
        // written between now and the task's first poll still counts as
        // a change.
        let baseline = manager.store().stored_fingerprint().ok();
        let handle = tokio::spawn(run(manager, tx, poll_interval, baseline));
        Self {
            handle,
            receiver: rx,
        }
    }

    /// Subscribe to externally-driven session changes.
    ///
    /// The channel keeps only the latest value: last write observed
    /// wins, exactly like the store itself.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.receiver.clone()
    }
}

impl Drop for StoreWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    manager: Arc<SessionManager>,
    tx: watch::Sender<Session>,
    poll_interval: Duration,
    mut last_seen: Option<u64>,
) {
    let store = manager.store().clone();

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it so the baseline
    // taken at registration stands for "no change yet".
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let current = match store.stored_fingerprint() {
            Ok(fingerprint) => fingerprint,
            Err(err) => {
                tracing::debug!(error = %err, "session store unreadable, will retry");
                continue;
            }
        };

        if last_seen == Some(current) {
            continue;
        }
        last_seen = Some(current);

        if store.is_own_write(current) {
            // Our own login/logout; the controller already has it.
            continue;
        }

        match manager.refresh_from_store() {
            Ok(session) => {
                tracing::info!(
                    authenticated = session.is_authenticated(),
                    "session changed outside this process"
                );
                let _ = tx.send(session);
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to refresh session from store");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_store::{FileStore, Profile, Role, SessionStore};
    use std::path::Path;

    const TEST_INTERVAL: Duration = Duration::from_millis(20);

    fn manager_at(path: &Path) -> Arc<SessionManager> {
        let store = Arc::new(SessionStore::new(Box::new(FileStore::new(path))));
        Arc::new(SessionManager::new(store).unwrap())
    }

    async fn wait_for<F: Fn() -> bool>(condition: F) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not met within one second");
    }

    #[tokio::test]
    async fn test_external_login_is_republished() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let ours = manager_at(&path);
        let theirs = manager_at(&path);

        let _watcher = StoreWatcher::spawn_with_interval(ours.clone(), TEST_INTERVAL);

        theirs
            .login(Some("tok-1".into()), Some(Profile::new(4, Role::Employer)))
            .unwrap();

        wait_for(|| ours.current().is_authenticated()).await;
        assert_eq!(ours.current().token(), Some("tok-1"));
        assert_eq!(ours.current().effective_role(), Some(Role::Employer));
    }

    #[tokio::test]
    async fn test_external_logout_is_republished() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let theirs = manager_at(&path);
        theirs
            .login(Some("tok-1".into()), Some(Profile::new(4, Role::User)))
            .unwrap();

        // Our process starts out seeing the logged-in session.
        let ours = manager_at(&path);
        assert!(ours.current().is_authenticated());

        let _watcher = StoreWatcher::spawn_with_interval(ours.clone(), TEST_INTERVAL);

        theirs.logout().unwrap();

        wait_for(|| !ours.current().is_authenticated()).await;
    }

    #[tokio::test]
    async fn test_own_write_is_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let ours = manager_at(&path);
        let watcher = StoreWatcher::spawn_with_interval(ours.clone(), TEST_INTERVAL);
        let rx = watcher.subscribe();

        ours.login(Some("tok-1".into()), Some(Profile::new(1, Role::User)))
            .unwrap();

        // Give the watcher several poll cycles to (wrongly) fire.
        tokio::time::sleep(TEST_INTERVAL * 5).await;

        // The subscriber never saw a change: the only write came from
        // this process, and the controller already applied it.
        assert!(!rx.has_changed().unwrap());
        assert_eq!(ours.current().token(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_subscriber_receives_external_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let ours = manager_at(&path);
        let theirs = manager_at(&path);

        let watcher = StoreWatcher::spawn_with_interval(ours.clone(), TEST_INTERVAL);
        let mut rx = watcher.subscribe();

        theirs
            .login(Some("tok-9".into()), Some(Profile::new(2, Role::User)))
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("no notification within one second")
            .unwrap();
        assert_eq!(rx.borrow().token(), Some("tok-9"));
    }

    #[tokio::test]
    async fn test_drop_stops_the_task() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let ours = manager_at(&path);
        let theirs = manager_at(&path);

        let watcher = StoreWatcher::spawn_with_interval(ours.clone(), TEST_INTERVAL);
        drop(watcher);
        tokio::time::sleep(TEST_INTERVAL * 2).await;

        theirs
            .login(Some("tok-1".into()), Some(Profile::new(1, Role::User)))
            .unwrap();
        tokio::time::sleep(TEST_INTERVAL * 5).await;

        // No watcher, no republish.
        assert!(!ours.current().is_authenticated());
    }
}
