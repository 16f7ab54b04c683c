//! High-level session persistence over a key-value backend.

use crate::{KeyValueStore, Profile, Session, StorageError, StorageKeys, StorageResult};
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Persistent session store: exactly two keys, `token` and `user`.
///
/// Reads are fail-safe: anything that does not deserialize into a fully
/// populated session comes back as the anonymous session, never as a
/// half-authenticated one.
pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
    // Fingerprint of the last state written through this handle, consumed
    // by the sync watcher to tell our own writes from external ones.
    last_written: Mutex<Option<u64>>,
}

impl SessionStore {
    /// Create a session store with the given storage backend.
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            last_written: Mutex::new(None),
        }
    }

    /// Read the persisted session.
    ///
    /// A corrupt profile, an empty token, or a token/user presence
    /// mismatch all read as logged out. The repair is silent at the API
    /// level because it is indistinguishable from "never logged in".
    pub fn read(&self) -> StorageResult<Session> {
        let token = self
            .storage
            .get(StorageKeys::TOKEN)?
            .filter(|t| !t.is_empty());
        let user = self.storage.get(StorageKeys::USER)?;

        Ok(match (token, user) {
            (Some(token), Some(raw)) => match serde_json::from_str::<Profile>(&raw) {
                Ok(profile) => Session::authenticated(token, profile),
                Err(err) => {
                    tracing::warn!(error = %err, "stored profile is corrupt, treating session as logged out");
                    Session::anonymous()
                }
            },
            (None, None) => Session::anonymous(),
            (token, user) => {
                tracing::warn!(
                    has_token = token.is_some(),
                    has_user = user.is_some(),
                    "stored session is half-populated, treating as logged out"
                );
                Session::anonymous()
            }
        })
    }

    /// Persist the session. Both keys are stored in one backend
    /// operation; writing the anonymous session is the same as `clear`.
    pub fn write(&self, session: &Session) -> StorageResult<()> {
        match (session.token(), session.user()) {
            (Some(token), Some(user)) => {
                let profile = serde_json::to_string(user)
                    .map_err(|e| StorageError::Encoding(e.to_string()))?;
                self.storage.set_many(&[
                    (StorageKeys::TOKEN, token),
                    (StorageKeys::USER, profile.as_str()),
                ])?;
                self.record_write(fingerprint(Some(token), Some(profile.as_str())));
            }
            _ => {
                self.storage
                    .delete_many(&[StorageKeys::TOKEN, StorageKeys::USER])?;
                self.record_write(fingerprint(None, None));
            }
        }
        Ok(())
    }

    /// Remove both keys.
    pub fn clear(&self) -> StorageResult<()> {
        self.storage
            .delete_many(&[StorageKeys::TOKEN, StorageKeys::USER])?;
        self.record_write(fingerprint(None, None));
        Ok(())
    }

    /// Fingerprint of the state currently persisted in the backend.
    ///
    /// The sync watcher polls this instead of deserializing the profile
    /// on every tick.
    pub fn stored_fingerprint(&self) -> StorageResult<u64> {
        let token = self.storage.get(StorageKeys::TOKEN)?;
        let user = self.storage.get(StorageKeys::USER)?;
        Ok(fingerprint(token.as_deref(), user.as_deref()))
    }

    /// If `candidate` matches the most recent write made through this
    /// handle, consume the record and return true.
    ///
    /// The sync watcher calls this so a change notification produced by
    /// our own `write`/`clear` does not loop back into the controller.
    pub fn is_own_write(&self, candidate: u64) -> bool {
        let mut last = self.last_written.lock();
        if *last == Some(candidate) {
            *last = None;
            true
        } else {
            false
        }
    }

    fn record_write(&self, value: u64) {
        *self.last_written.lock() = Some(value);
    }
}

fn fingerprint(token: Option<&str>, user: Option<&str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    user.hash(&mut hasher);
    hasher.finish()
}
