//! Error responses in the backend's envelope.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    error: &'static str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_errors: Option<BTreeMap<String, String>>,
}

/// A failed request.
#[derive(Debug)]
pub struct MockError {
    status: StatusCode,
    message: String,
    validation: Option<BTreeMap<String, String>>,
}

impl MockError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            validation: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Full authentication is required")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Access denied")
    }

    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{what} not found with id: {id}"))
    }

    pub fn validation(errors: BTreeMap<String, String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_owned(),
            validation: Some(errors),
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
            error: self.status.canonical_reason().unwrap_or("Error"),
            status: self.status.as_u16(),
            validation_errors: self.validation,
        };
        (self.status, Json(body)).into_response()
    }
}
