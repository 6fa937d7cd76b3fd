//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TASKDESK_API_URL` - REST API base URL, including the `/api` prefix
//!   (default: `http://localhost:8080/api`)
//! - `TASKDESK_SESSION_FILE` - Where the session token and profile are kept
//!   (default: `<data dir>/taskdesk/session.json`)
//! - `TASKDESK_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `TASKDESK_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format for the command-line front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API base URL, e.g. `http://localhost:8080/api`
    pub api_url: Url,
    /// JSON file standing in for browser local storage
    pub session_file: PathBuf,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value or
    /// no session file location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("TASKDESK_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("TASKDESK_API_URL".to_string(), e))?;

        let session_file = match get_optional_env("TASKDESK_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file()
                .ok_or_else(|| ConfigError::MissingEnvVar("TASKDESK_SESSION_FILE".to_string()))?,
        };

        let timeout_secs = get_env_or_default("TASKDESK_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TASKDESK_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let log_format = match get_optional_env("TASKDESK_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "TASKDESK_LOG_FORMAT".to_string(),
                    format!("expected `pretty` or `json`, got `{other}`"),
                ));
            }
        };

        Ok(Self {
            api_url,
            session_file,
            http_timeout: Duration::from_secs(timeout_secs),
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Configuration pointing at `api_url`, with defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed.
    pub fn for_api_url(api_url: &str, session_file: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)
                .map_err(|e| ConfigError::InvalidEnvVar("TASKDESK_API_URL".to_string(), e))?,
            session_file,
            http_timeout: Duration::from_secs(30),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_api_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme `{other}`")),
    }
}

fn default_session_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("taskdesk").join("session.json"))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_rejects_non_http() {
        assert!(parse_api_url("http://localhost:8080/api").is_ok());
        assert!(parse_api_url("https://tasks.example.org/api").is_ok());
        assert!(parse_api_url("ftp://tasks.example.org").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn test_for_api_url_defaults() {
        let config =
            ClientConfig::for_api_url("http://127.0.0.1:9000/api", PathBuf::from("s.json")).unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:9000/api");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.sentry_dsn.is_none());
    }
}
