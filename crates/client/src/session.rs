//! Session store.
//!
//! Wraps a [`SessionStorage`] backend and knows how the session is laid out
//! in it: the raw token under `token`, the reduced user profile as JSON under
//! `user`. Cheap to clone; all clones share the same backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::warn;

use taskdesk_core::AuthUser;

use crate::storage::{MemoryStorage, SessionStorage, StorageError, TOKEN_KEY, USER_KEY};
use crate::token;

/// Errors reading a persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Stored user profile is malformed: {0}")]
    MalformedProfile(#[from] serde_json::Error),
}

/// A persisted session: the bearer token and the profile of its owner.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: AuthUser,
}

/// Handle to the persisted session.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// A store backed by fresh in-process storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persist a session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if either key cannot be written. A token is never
    /// left behind without its profile.
    pub fn persist(&self, session: &Session) -> Result<(), SessionError> {
        let profile = serde_json::to_string(&session.user)?;
        self.storage.set(TOKEN_KEY, session.token.expose_secret())?;
        if let Err(e) = self.storage.set(USER_KEY, &profile) {
            warn!(error = %e, "Failed to save user profile; dropping session");
            self.clear();
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove both session keys. Never fails; storage errors are logged.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to clear session key");
            }
        }
    }

    /// Read the persisted profile, reporting storage and decoding failures.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the profile is not
    /// valid JSON for an [`AuthUser`].
    pub fn load_profile(&self) -> Result<Option<AuthUser>, SessionError> {
        self.storage
            .get(USER_KEY)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(SessionError::from)
    }

    /// The persisted profile, or `None` if absent or malformed.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.load_profile().ok().flatten()
    }

    /// The persisted token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Whether a token is stored and unexpired right now.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// Whether a token is stored and unexpired at `now`.
    ///
    /// An undecodable or expired token yields `false`; storage is left as is.
    #[must_use]
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.token()
            .is_some_and(|token| token::is_token_valid_at(token.expose_secret(), now))
    }
}
