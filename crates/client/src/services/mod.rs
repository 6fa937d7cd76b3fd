//! Domain services over the REST API.
//!
//! Each service is a cheap-to-clone wrapper around the shared [`ApiClient`]
//! with one method per endpoint. Form validation and business rules from
//! `taskdesk-core` run before any request is sent.
//!
//! [`ApiClient`]: crate::api::ApiClient

mod checklist;
mod employees;
mod members;
mod tasks;

pub use checklist::ChecklistView;
pub use employees::{EmployeeRequest, EmployeeService};
pub use members::MemberService;
pub use tasks::TaskService;

use thiserror::Error;

use taskdesk_core::{TaskRuleError, ValidationErrors};

use crate::api::ApiError;

/// Errors from service calls that validate locally before hitting the API.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The form failed client-side validation; nothing was sent.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// A business rule refused the operation; nothing was sent.
    #[error(transparent)]
    Rule(#[from] TaskRuleError),

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ServiceError {
    /// Field errors, whether found locally or returned by the server.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Api(err) => err.validation_errors(),
            Self::Rule(_) => None,
        }
    }
}
