//! REST API client.
//!
//! Thin JSON-over-HTTP layer shared by every domain service. Requests carry
//! the persisted session token as a bearer header when one exists. Failures
//! are normalized into [`ApiError`] with the server's message, or the
//! per-operation fallback message when the server sent none.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use taskdesk_core::ValidationErrors;

use crate::config::ClientConfig;
use crate::session::SessionStore;

/// Errors from talking to the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
        validation: Option<ValidationErrors>,
    },

    /// The request never got an answer (connection, timeout, TLS).
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a body this client could not decode.
    #[error("{message}")]
    Decode {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request URL could not be built.
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// The human-readable message to show the user.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field errors the server attached to a rejected request.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Status {
                validation: Some(errors),
                ..
            } => Some(errors),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }
}

/// Error envelope returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<ValidationErrors>,
}

impl ApiErrorBody {
    /// `message`, else `error`, else `fallback`. Blank strings are skipped.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_owned()
    }
}

/// REST API client.
///
/// Cheaply cloneable; clones share the connection pool and session store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Client` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        Self::with_timeout(config.api_url.clone(), config.http_timeout, session)
    }

    /// Create a client for `base_url` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Client` if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: Url,
        timeout: Duration,
        session: SessionStore,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url,
                session,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Resolve `path` (e.g. `/tasks/3`) below the base URL.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None::<&()>, fallback).await?;
        decode(response, fallback).await
    }

    pub(crate) async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, Some(body), fallback).await?;
        decode(response, fallback).await
    }

    pub(crate) async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PUT, path, Some(body), fallback).await?;
        decode(response, fallback).await
    }

    pub(crate) async fn delete(&self, path: &str, fallback: &'static str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None::<&()>, fallback)
            .await
            .map(drop)
    }

    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        fallback: &'static str,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.inner.http.request(method, self.url(path)?);
        if let Some(token) = self.inner.session.token() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| {
            warn!(error = %source, "Request failed before a response arrived");
            ApiError::Transport {
                message: fallback.to_owned(),
                source,
            }
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "Response received");
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort; an empty or non-JSON body just means
        // the fallback message is used.
        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        let message = body.message_or(fallback);
        warn!(status = status.as_u16(), %message, "Request rejected");

        Err(ApiError::Status {
            status,
            message,
            validation: body.validation_errors.filter(|v| !v.is_empty()),
        })
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &'static str,
) -> Result<T, ApiError> {
    response.json().await.map_err(|source| ApiError::Decode {
        message: fallback.to_owned(),
        source,
    })
}
