//! Authentication error types.

use thiserror::Error;

use taskdesk_core::ValidationErrors;

use crate::api::ApiError;
use crate::session::SessionError;

/// Errors that can occur during login and registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("{0}")]
    InvalidEmail(#[from] taskdesk_core::EmailError),

    /// A required field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The backend refused the request.
    #[error("{message}")]
    Rejected {
        message: String,
        validation: Option<ValidationErrors>,
    },

    /// The session could not be written.
    #[error("Failed to save session: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Field errors the backend attached, if any.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Rejected {
                validation: Some(errors),
                ..
            } => Some(errors),
            _ => None,
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        Self::Rejected {
            validation: err.validation_errors().cloned(),
            message: err.message(),
        }
    }
}
