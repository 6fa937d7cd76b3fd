//! Login, registration and session commands.
//!
//! # Usage
//!
//! ```bash
//! taskdesk login -e admin@taskdesk.dev --password secret
//! taskdesk register -n "Grace Hopper" -e grace@taskdesk.dev --password secret
//! taskdesk whoami
//! taskdesk logout
//! ```

use secrecy::SecretString;
use tracing::info;

use taskdesk_client::{AppState, Credentials, Registration, Route, dashboard_for};

use super::{CliError, enter_public};
use crate::view;

/// Log in and report the dashboard the user lands on.
pub async fn login(state: &AppState, email: String, password: String) -> Result<(), CliError> {
    enter_public(state, &Route::Login)?;

    let user = state
        .auth()
        .login(&Credentials {
            email,
            password: SecretString::from(password),
        })
        .await?;

    info!(user_id = ?user.id, "Login succeeded");
    match dashboard_for(&user.role) {
        Some(route) => view::note(&format!("Welcome, {}. Your dashboard is {route}.", user.full_name)),
        None => return Err(CliError::UnrecognizedRole(user.role.to_string())),
    }
    Ok(())
}

/// Create an account. The caller stays logged out.
pub async fn register(
    state: &AppState,
    full_name: String,
    email: String,
    password: String,
) -> Result<(), CliError> {
    enter_public(state, &Route::Register)?;

    let profile = state
        .auth()
        .auth()
        .register(&Registration {
            full_name,
            email,
            password: SecretString::from(password),
        })
        .await?;

    view::registered(&profile);
    Ok(())
}

pub fn logout(state: &AppState) {
    state.auth().logout();
    view::note("Logged out");
}

pub fn whoami(state: &AppState) {
    view::whoami(&state.auth().snapshot());
}
