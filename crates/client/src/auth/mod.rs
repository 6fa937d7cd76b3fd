//! Authentication service.
//!
//! Password login and registration against the `/auth` endpoints. A
//! successful login persists the token and the reduced user profile in the
//! session store; registration never logs the new user in.

mod context;
mod error;

pub use context::{AuthContext, AuthPhase, AuthSnapshot, LOGIN_FAILED_MESSAGE, LoginFailure};
pub use error::AuthError;

use chrono::NaiveDateTime;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use taskdesk_core::{AuthUser, Email, RegisteredProfile, Role, UserId};

use crate::api::ApiClient;
use crate::session::{Session, SessionError, SessionStore};

/// Login credentials as entered by the user.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: SecretString,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    /// Not every backend version sends it.
    #[serde(default)]
    pub id: Option<UserId>,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub expires_at: Option<NaiveDateTime>,
}

impl LoginResponse {
    /// The session to persist: the token plus the reduced profile.
    #[must_use]
    pub fn into_session(self) -> Session {
        Session {
            token: SecretString::from(self.token),
            user: AuthUser {
                id: self.id,
                full_name: self.full_name,
                email: self.email,
                role: self.role,
            },
        }
    }
}

/// Authentication service.
///
/// Cheap to clone; shares the API client and its session store.
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }

    /// Log in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::MissingField` before
    /// any request is sent, `AuthError::Rejected` with the server's message
    /// (or `Login failed`) if the backend refuses, and `AuthError::Session`
    /// if the session cannot be saved.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let email = Email::parse(&credentials.email)?;
        let password = credentials.password.expose_secret();
        if password.is_empty() {
            return Err(AuthError::MissingField("Password"));
        }

        let response: LoginResponse = self
            .api
            .post(
                "/auth/login",
                &LoginRequest {
                    email: email.as_str(),
                    password,
                },
                "Login failed",
            )
            .await?;

        let session = response.into_session();
        self.session().persist(&session)?;
        info!(user_id = ?session.user.id, role = %session.user.role, "Logged in");
        Ok(session)
    }

    /// Register a new account. The caller stays logged out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` or `AuthError::InvalidEmail` before
    /// any request is sent, and `AuthError::Rejected` with the server's
    /// message (or `Registration failed`) if the backend refuses.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<RegisteredProfile, AuthError> {
        let full_name = registration.full_name.trim();
        if full_name.is_empty() {
            return Err(AuthError::MissingField("Full name"));
        }
        let email = Email::parse(&registration.email)?;
        let password = registration.password.expose_secret();
        if password.is_empty() {
            return Err(AuthError::MissingField("Password"));
        }

        let profile: RegisteredProfile = self
            .api
            .post(
                "/auth/register",
                &RegisterRequest {
                    full_name,
                    email: email.as_str(),
                    password,
                },
                "Registration failed",
            )
            .await?;

        info!(user_id = %profile.id, "Registered");
        Ok(profile)
    }

    /// Forget the session. Idempotent and never fails.
    pub fn logout(&self) {
        self.session().clear();
        info!("Logged out");
    }

    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.session().current_user()
    }

    /// Like [`Self::current_user`], but reports why the profile is unreadable.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the profile is malformed.
    pub fn load_profile(&self) -> Result<Option<AuthUser>, SessionError> {
        self.session().load_profile()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.session().token()
    }
}
