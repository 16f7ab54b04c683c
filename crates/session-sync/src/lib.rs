//! Cross-process session synchronization.
//!
//! The browser client listened for `storage` events so a login or
//! logout in another tab updated every open tab. Here the equivalent is
//! a watcher task that polls the shared session file and republishes
//! external changes into this process's `SessionManager`.

mod watcher;

pub use watcher::{StoreWatcher, DEFAULT_POLL_INTERVAL};
