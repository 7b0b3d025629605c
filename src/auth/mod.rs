//! Per-session login state.
//!
//! A [`SessionStore`] holds the identity of one browser session and mirrors
//! it into a [`KeyValueStore`] so it can be restored on the next request.

mod credentials;

pub use credentials::CredentialStore;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::backend::{Backend, BackendError};
use crate::db::{Identity, Role};
use crate::navigation::Viewer;
use crate::storage::{KeyValueStore, StorageError};

/// Key the identity is persisted under.
pub const USER_KEY: &str = "user";

pub fn session_key(session_id: &str) -> String {
    format!("{USER_KEY}:{session_id}")
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    current: Option<Identity>,
}

impl SessionStore {
    /// Opens a session, reading any identity persisted under `key`.
    /// Unreadable or malformed entries count as logged out.
    pub fn restore(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = match storage.get_item(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!(key = %key, "Discarding malformed persisted identity: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, "Failed to read persisted identity: {}", e);
                None
            }
        };
        Self {
            storage,
            key,
            current,
        }
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::from_identity(self.current.as_ref())
    }

    /// `Ok(false)` for any credential mismatch; the identity stays unset.
    /// The identity is only set once it has been persisted.
    pub async fn login(
        &mut self,
        backend: &dyn Backend,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<bool, SessionError> {
        let Some(identity) = backend.authenticate(email, password, role).await? else {
            warn!(email, role = role.as_str(), "Login failed");
            return Ok(false);
        };

        self.persist(&identity)?;
        info!(user_id = %identity.id, role = role.as_str(), "Login successful");
        self.current = Some(identity);
        Ok(true)
    }

    /// Creates an author account. Does not log the new user in.
    pub async fn register(
        &self,
        backend: &dyn Backend,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, BackendError> {
        match backend.register(name, email, password).await? {
            Some(identity) => {
                info!(user_id = %identity.id, "Registered new author");
                Ok(true)
            }
            None => {
                warn!(email, "Registration failed: email already in use");
                Ok(false)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(identity) = self.current.take() {
            info!(user_id = %identity.id, "Logged out");
        }
        if let Err(e) = self.storage.remove_item(&self.key) {
            warn!(key = %self.key, "Failed to clear persisted identity: {}", e);
        }
    }

    fn persist(&self, identity: &Identity) -> Result<(), StorageError> {
        let raw = serde_json::to_string(identity)?;
        self.storage.set_item(&self.key, &raw)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
