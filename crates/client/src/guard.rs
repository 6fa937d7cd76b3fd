//! Route table and route guards.
//!
//! Every view is reached through a [`Route`]. Before a view runs, [`guard`]
//! decides from an [`AuthSnapshot`] whether it renders, redirects, waits for
//! startup to finish, or ends in a terminal access-denied view.

use std::fmt;

use taskdesk_core::{Role, TaskId};

use crate::auth::AuthSnapshot;

/// Role a protected route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    Admin,
    /// Regular team members; the legacy `EMPLOYEE` role qualifies too.
    Member,
}

impl RequiredRole {
    #[must_use]
    pub const fn admits(self, role: &Role) -> bool {
        match self {
            Self::Admin => matches!(role, Role::Admin),
            Self::Member => role.is_member_like(),
        }
    }
}

impl fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        })
    }
}

/// What a route requires of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only for logged-out users; logged-in users go to their dashboard.
    PublicOnly,
    /// Any logged-in user.
    Authenticated,
    /// A logged-in user with the given role.
    Role(RequiredRole),
    /// Anyone, logged in or not.
    Open,
}

/// Every view in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    AdminDashboard,
    AdminTasks,
    AdminTaskCreate,
    AdminTaskEdit(TaskId),
    AdminMembers,
    MemberDashboard,
    MemberTasks,
    MemberTaskDetail(TaskId),
    Employees,
    EmployeeCreate,
    NotFound(String),
}

impl Route {
    /// Resolve a path. Unknown paths become [`Route::NotFound`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["admin", "dashboard"] => Self::AdminDashboard,
            ["admin", "tasks"] => Self::AdminTasks,
            ["admin", "tasks", "create"] => Self::AdminTaskCreate,
            ["admin", "tasks", id, "edit"] => id
                .parse()
                .map_or_else(|_| Self::NotFound(trimmed.to_owned()), Self::AdminTaskEdit),
            ["admin", "members"] => Self::AdminMembers,
            ["member", "dashboard"] => Self::MemberDashboard,
            ["member", "tasks"] => Self::MemberTasks,
            ["member", "tasks", id] => id
                .parse()
                .map_or_else(|_| Self::NotFound(trimmed.to_owned()), Self::MemberTaskDetail),
            ["dashboard", "employees"] => Self::Employees,
            ["dashboard", "employees", "create"] => Self::EmployeeCreate,
            _ => Self::NotFound(trimmed.to_owned()),
        }
    }

    /// Canonical path of the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::AdminDashboard => "/admin/dashboard".to_owned(),
            Self::AdminTasks => "/admin/tasks".to_owned(),
            Self::AdminTaskCreate => "/admin/tasks/create".to_owned(),
            Self::AdminTaskEdit(id) => format!("/admin/tasks/{id}/edit"),
            Self::AdminMembers => "/admin/members".to_owned(),
            Self::MemberDashboard => "/member/dashboard".to_owned(),
            Self::MemberTasks => "/member/tasks".to_owned(),
            Self::MemberTaskDetail(id) => format!("/member/tasks/{id}"),
            Self::Employees => "/dashboard/employees".to_owned(),
            Self::EmployeeCreate => "/dashboard/employees/create".to_owned(),
            Self::NotFound(path) => path.clone(),
        }
    }

    #[must_use]
    pub const fn access(&self) -> Access {
        match self {
            Self::Home | Self::Login | Self::Register => Access::PublicOnly,
            Self::AdminDashboard
            | Self::AdminTasks
            | Self::AdminTaskCreate
            | Self::AdminTaskEdit(_)
            | Self::AdminMembers => Access::Role(RequiredRole::Admin),
            Self::MemberDashboard | Self::MemberTasks | Self::MemberTaskDetail(_) => {
                Access::Role(RequiredRole::Member)
            }
            Self::Employees | Self::EmployeeCreate => Access::Authenticated,
            Self::NotFound(_) => Access::Open,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decision of a route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Startup has not finished; show a placeholder and decide nothing.
    Loading,
    /// Go elsewhere instead.
    Redirect(Route),
    /// Logged in with the wrong role. Terminal; offers logout or home.
    AccessDenied { required: RequiredRole },
    /// Logged in with a role no dashboard exists for. Terminal; offers logout.
    UnrecognizedRole(String),
    /// Show the requested view.
    Render,
}

/// Dashboard a role lands on, or `None` for an unrecognized role.
#[must_use]
pub const fn dashboard_for(role: &Role) -> Option<Route> {
    match role {
        Role::Admin => Some(Route::AdminDashboard),
        Role::Member | Role::Employee => Some(Route::MemberDashboard),
        Role::Unknown(_) => None,
    }
}

/// Guard for protected routes.
#[must_use]
pub fn protect(snapshot: &AuthSnapshot, required: Option<RequiredRole>) -> GuardOutcome {
    if snapshot.loading {
        return GuardOutcome::Loading;
    }
    let Some(user) = snapshot.user.as_ref().filter(|_| snapshot.is_authenticated) else {
        return GuardOutcome::Redirect(Route::Home);
    };
    match required {
        Some(required) if !required.admits(&user.role) => GuardOutcome::AccessDenied { required },
        _ => GuardOutcome::Render,
    }
}

/// Guard for routes only logged-out users should see.
#[must_use]
pub fn public_only(snapshot: &AuthSnapshot) -> GuardOutcome {
    if snapshot.loading {
        return GuardOutcome::Loading;
    }
    match snapshot.user.as_ref().filter(|_| snapshot.is_authenticated) {
        None => GuardOutcome::Render,
        Some(user) => dashboard_for(&user.role).map_or_else(
            || GuardOutcome::UnrecognizedRole(user.role.as_str().to_owned()),
            GuardOutcome::Redirect,
        ),
    }
}

/// Run the guard matching `route`'s access rule.
#[must_use]
pub fn guard(route: &Route, snapshot: &AuthSnapshot) -> GuardOutcome {
    match route.access() {
        Access::PublicOnly => public_only(snapshot),
        Access::Authenticated => protect(snapshot, None),
        Access::Role(required) => protect(snapshot, Some(required)),
        Access::Open => GuardOutcome::Render,
    }
}
