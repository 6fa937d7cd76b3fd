//! Path-based navigation.
//!
//! `taskdesk open <path>` resolves a path through the route table and the
//! guards, following redirects the way the browser router would, then
//! renders the read-only version of the view it lands on.

use tracing::debug;

use taskdesk_client::{AppState, GuardOutcome, Route, guard};
use taskdesk_core::TaskFilter;

use super::{CliError, admin, employees, member};
use crate::view;

/// Guards only ever redirect home or to a dashboard, so chains are short.
const MAX_REDIRECTS: usize = 3;

/// Follow guard redirects from `route` to the route that renders.
pub fn resolve(state: &AppState, mut route: Route) -> Result<Route, CliError> {
    for _ in 0..=MAX_REDIRECTS {
        match guard(&route, &state.auth().snapshot()) {
            GuardOutcome::Render => return Ok(route),
            GuardOutcome::Redirect(next) => {
                debug!(from = %route, to = %next, "Redirecting");
                route = next;
            }
            GuardOutcome::Loading => return Err(CliError::Loading),
            GuardOutcome::AccessDenied { required } => {
                return Err(CliError::AccessDenied { required });
            }
            GuardOutcome::UnrecognizedRole(role) => return Err(CliError::UnrecognizedRole(role)),
        }
    }
    Err(CliError::NotFound(route.path()))
}

/// Render the view at `path`.
pub async fn open(state: &AppState, path: &str) -> Result<(), CliError> {
    match resolve(state, Route::parse(path))? {
        Route::Home | Route::Login => {
            view::note("Log in with `taskdesk login -e <email> --password <password>`");
        }
        Route::Register => {
            view::note("Create an account with `taskdesk register -n <name> -e <email> --password <password>`");
        }
        Route::AdminDashboard => admin::dashboard(state).await?,
        Route::AdminTasks => admin::list_tasks(state, TaskFilter::All).await?,
        Route::AdminTaskCreate => view::note("Create a task with `taskdesk tasks create`"),
        Route::AdminTaskEdit(id) => admin::show_task(state, id).await?,
        Route::AdminMembers => admin::members(state, None).await?,
        Route::MemberDashboard => member::dashboard(state).await?,
        Route::MemberTasks => member::my_tasks(state, TaskFilter::All).await?,
        Route::MemberTaskDetail(id) => member::show_task(state, id).await?,
        Route::Employees => employees::list(state).await?,
        Route::EmployeeCreate => view::note("Add an employee with `taskdesk employees create`"),
        Route::NotFound(path) => return Err(CliError::NotFound(path)),
    }
    Ok(())
}

/// Render the signed-in user's dashboard.
pub async fn dashboard(state: &AppState) -> Result<(), CliError> {
    match resolve(state, Route::Home)? {
        Route::Home => Err(CliError::NotLoggedIn),
        route => open(state, &route.path()).await,
    }
}
