//! Process-wide authentication state.
//!
//! One [`AuthContext`] is built at startup and shared by handle. It starts in
//! [`AuthPhase::Initializing`] and moves to [`AuthPhase::Ready`] exactly once,
//! after the persisted session has been checked.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use taskdesk_core::AuthUser;

use super::{AuthError, AuthService, Credentials};

/// Message shown when a login failure carries nothing more specific.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again";

/// Startup phase of the auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// The persisted session has not been checked yet.
    Initializing,
    /// Startup check done; `user` is authoritative.
    Ready,
}

/// Point-in-time view of the auth state, as read by the route guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub user: Option<AuthUser>,
    pub loading: bool,
    pub is_authenticated: bool,
}

impl AuthSnapshot {
    /// Snapshot of a logged-out, initialized state.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
            is_authenticated: false,
        }
    }
}

/// A failed login, with the message to show the user.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LoginFailure {
    pub message: String,
    #[source]
    pub source: AuthError,
}

impl From<AuthError> for LoginFailure {
    fn from(source: AuthError) -> Self {
        let message = source.to_string();
        let message = if message.trim().is_empty() {
            LOGIN_FAILED_MESSAGE.to_owned()
        } else {
            message
        };
        Self { message, source }
    }
}

#[derive(Debug)]
struct AuthState {
    phase: AuthPhase,
    user: Option<AuthUser>,
}

/// Shared authentication state.
///
/// Cheaply cloneable; all clones observe the same state.
#[derive(Debug, Clone)]
pub struct AuthContext {
    inner: Arc<AuthContextInner>,
}

#[derive(Debug)]
struct AuthContextInner {
    auth: AuthService,
    state: RwLock<AuthState>,
}

impl AuthContext {
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        Self {
            inner: Arc::new(AuthContextInner {
                auth,
                state: RwLock::new(AuthState {
                    phase: AuthPhase::Initializing,
                    user: None,
                }),
            }),
        }
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.inner.state.read().phase
    }

    /// Check the persisted session and leave the initializing phase.
    ///
    /// A profile is only restored together with an unexpired token. Anything
    /// else found in storage (stale profile, orphaned token, unreadable data)
    /// is cleared. Later calls are no-ops.
    pub fn initialize(&self) -> AuthSnapshot {
        let mut state = self.inner.state.write();
        if state.phase == AuthPhase::Ready {
            drop(state);
            return self.snapshot();
        }

        let auth = &self.inner.auth;
        state.user = match auth.load_profile() {
            Ok(Some(user)) if auth.is_authenticated() => {
                info!(user_id = ?user.id, "Restored session");
                Some(user)
            }
            Ok(Some(user)) => {
                info!(user_id = ?user.id, "Stored session expired");
                auth.logout();
                None
            }
            Ok(None) => {
                if auth.token().is_some() {
                    debug!("Clearing token stored without a profile");
                    auth.logout();
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                auth.logout();
                None
            }
        };
        state.phase = AuthPhase::Ready;
        drop(state);

        self.snapshot()
    }

    /// Current state. `is_authenticated` is recomputed from the stored token
    /// on every call, so a session that expires mid-run reads as logged out.
    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        let (loading, user) = {
            let state = self.inner.state.read();
            (state.phase == AuthPhase::Initializing, state.user.clone())
        };
        let is_authenticated = user.is_some() && self.inner.auth.is_authenticated();
        AuthSnapshot {
            user,
            loading,
            is_authenticated,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<AuthUser> {
        self.inner.state.read().user.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase() == AuthPhase::Initializing
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated
    }

    /// Log in and make the returned user current.
    ///
    /// # Errors
    ///
    /// Returns a [`LoginFailure`] carrying a displayable message. The state
    /// is left unchanged.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthUser, LoginFailure> {
        let session = self.inner.auth.login(credentials).await?;
        self.inner.state.write().user = Some(session.user.clone());
        Ok(session.user)
    }

    /// Clear the session and the current user. No network call.
    pub fn logout(&self) {
        self.inner.auth.logout();
        self.inner.state.write().user = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration as StdDuration;

    use chrono::Duration;
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::session::SessionStore;
    use crate::session::tests::{admin, session, token_expiring_in};
    use crate::storage::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};

    fn context(storage: &Arc<MemoryStorage>) -> AuthContext {
        let api = ApiClient::with_timeout(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            StdDuration::from_secs(1),
            SessionStore::new(storage.clone()),
        )
        .unwrap();
        AuthContext::new(AuthService::new(api))
    }

    #[test]
    fn test_loading_until_initialized() {
        let ctx = context(&Arc::new(MemoryStorage::new()));
        let before = ctx.snapshot();
        assert!(before.loading);
        assert!(!before.is_authenticated);

        let after = ctx.initialize();
        assert_eq!(after, AuthSnapshot::anonymous());
        assert_eq!(ctx.phase(), AuthPhase::Ready);
    }

    #[test]
    fn test_initialize_restores_valid_session() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = context(&storage);
        ctx.auth().session().persist(&session(Duration::hours(1))).unwrap();

        let snapshot = ctx.initialize();
        assert!(!snapshot.loading);
        assert!(snapshot.is_authenticated);
        assert_eq!(snapshot.user, Some(admin()));
    }

    #[test]
    fn test_initialize_clears_expired_session() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = context(&storage);
        ctx.auth().session().persist(&session(-Duration::minutes(1))).unwrap();

        let snapshot = ctx.initialize();
        assert_eq!(snapshot, AuthSnapshot::anonymous());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_initialize_clears_malformed_profile() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, &token_expiring_in(Duration::hours(1))).unwrap();
        storage.set(USER_KEY, "{\"id\":").unwrap();
        let ctx = context(&storage);

        assert_eq!(ctx.initialize(), AuthSnapshot::anonymous());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_initialize_runs_once() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = context(&storage);
        ctx.initialize();

        ctx.auth().session().persist(&session(Duration::hours(1))).unwrap();
        assert!(ctx.initialize().user.is_none());
    }

    #[test]
    fn test_is_authenticated_recomputed_on_read() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = context(&storage);
        ctx.auth().session().persist(&session(Duration::hours(1))).unwrap();
        assert!(ctx.initialize().is_authenticated);

        storage.set(TOKEN_KEY, &token_expiring_in(-Duration::seconds(1))).unwrap();
        let snapshot = ctx.snapshot();
        assert!(!snapshot.is_authenticated);
        assert!(snapshot.user.is_some());
    }

    #[test]
    fn test_logout_resets_user_and_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = context(&storage);
        ctx.auth().session().persist(&session(Duration::hours(1))).unwrap();
        ctx.initialize();

        ctx.logout();
        ctx.logout();
        assert_eq!(ctx.snapshot(), AuthSnapshot::anonymous());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_unchanged() {
        let ctx = context(&Arc::new(MemoryStorage::new()));
        ctx.initialize();

        let failure = ctx
            .login(&Credentials::new("", "secret"))
            .await
            .unwrap_err();
        assert_eq!(failure.message, "Email is required");
        assert!(ctx.user().is_none());
    }

    #[test]
    fn test_blank_failure_message_is_normalized() {
        let failure = LoginFailure::from(AuthError::Rejected {
            message: String::new(),
            validation: None,
        });
        assert_eq!(failure.message, LOGIN_FAILED_MESSAGE);
    }
}
