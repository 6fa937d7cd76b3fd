//! Command implementations.
//!
//! Every command names the [`Route`] it renders and passes the route guard
//! before doing anything else, exactly as a browser view would.

pub mod admin;
pub mod auth;
pub mod employees;
pub mod member;
pub mod navigate;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use taskdesk_client::{
    ApiError, AppState, AuthError, GuardOutcome, LoginFailure, RequiredRole, Route, ServiceError,
    guard,
};
use taskdesk_core::{AuthUser, MissingUserId};

/// Errors surfaced to the user by a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not logged in. Run `taskdesk login` first.")]
    NotLoggedIn,

    #[error("Access denied: this view requires the {required} role. Run `taskdesk logout` or `taskdesk dashboard`.")]
    AccessDenied { required: RequiredRole },

    #[error("Unrecognized role `{0}`. Run `taskdesk logout` and sign in again.")]
    UnrecognizedRole(String),

    #[error("Already logged in. Your dashboard is {0}.")]
    AlreadyLoggedIn(Route),

    #[error("Still loading the session")]
    Loading,

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    MissingUserId(#[from] MissingUserId),

    #[error(transparent)]
    Login(#[from] LoginFailure),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Turn a guard decision into "go ahead" or the error the command stops with.
fn allow(outcome: GuardOutcome) -> Result<(), CliError> {
    match outcome {
        GuardOutcome::Render => Ok(()),
        GuardOutcome::Loading => Err(CliError::Loading),
        GuardOutcome::Redirect(Route::Home) => Err(CliError::NotLoggedIn),
        GuardOutcome::Redirect(route) => Err(CliError::AlreadyLoggedIn(route)),
        GuardOutcome::AccessDenied { required } => Err(CliError::AccessDenied { required }),
        GuardOutcome::UnrecognizedRole(role) => Err(CliError::UnrecognizedRole(role)),
    }
}

/// Pass the guard for a protected `route` and return the viewer.
pub fn enter(state: &AppState, route: &Route) -> Result<AuthUser, CliError> {
    let snapshot = state.auth().snapshot();
    allow(guard(route, &snapshot))?;
    snapshot.user.ok_or(CliError::NotLoggedIn)
}

/// Pass the guard for a public-only `route`.
pub fn enter_public(state: &AppState, route: &Route) -> Result<(), CliError> {
    allow(guard(route, &state.auth().snapshot()))
}

/// The viewer's local calendar date, used for due-date checks.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
