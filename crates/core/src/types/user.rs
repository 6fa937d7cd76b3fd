//! Users, registration profiles, and legacy employee records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EmployeeId, EmployeeStatus, Role, UserId};

/// A team member or admin as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// Up to two upper-cased initials for avatar badges.
    ///
    /// ```
    /// # use taskdesk_core::{Role, User, UserId};
    /// let user = User {
    ///     id: UserId::new(1),
    ///     full_name: "ada lovelace byron".to_owned(),
    ///     email: "ada@taskdesk.dev".to_owned(),
    ///     role: Role::Member,
    /// };
    /// assert_eq!(user.initials(), "AL");
    /// ```
    #[must_use]
    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// The session has no numeric user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Your session does not carry a user id. Please log in again")]
pub struct MissingUserId;

/// The logged-in user: the reduced profile persisted next to the session
/// token.
///
/// The login response does not always carry the numeric id. Views that query
/// by user go through [`AuthUser::require_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// The user id, for views that look up the user's own tasks.
    ///
    /// # Errors
    ///
    /// Returns [`MissingUserId`] if the login response did not include one.
    pub const fn require_id(&self) -> Result<UserId, MissingUserId> {
        match self.id {
            Some(id) => Ok(id),
            None => Err(MissingUserId),
        }
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: Some(user.id),
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Profile returned by the backend after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Legacy employee directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_uses_camel_case_fields() {
        let json = r#"{"id":3,"fullName":"Grace Hopper","email":"grace@taskdesk.dev","role":"ADMIN"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name, "Grace Hopper");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(serde_json::to_string(&user).unwrap(), json);
    }

    #[test]
    fn test_initials_handles_single_and_empty_names() {
        let mut user = User {
            id: UserId::new(1),
            full_name: "plato".to_owned(),
            email: "plato@taskdesk.dev".to_owned(),
            role: Role::Member,
        };
        assert_eq!(user.initials(), "P");

        user.full_name = "   ".to_owned();
        assert_eq!(user.initials(), "");
    }

    #[test]
    fn test_auth_user_without_id() {
        let json = r#"{"fullName":"Ada Admin","email":"ada@taskdesk.dev","role":"ADMIN"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, None);
        assert_eq!(user.require_id(), Err(MissingUserId));
        assert_eq!(serde_json::to_string(&user).unwrap(), json);
    }

    #[test]
    fn test_auth_user_from_member() {
        let member = User {
            id: UserId::new(4),
            full_name: "Grace Hopper".to_owned(),
            email: "grace@taskdesk.dev".to_owned(),
            role: Role::Member,
        };
        let user = AuthUser::from(member);
        assert_eq!(user.require_id(), Ok(UserId::new(4)));
    }

    #[test]
    fn test_employee_optional_fields_default() {
        let json = r#"{"id":9,"name":"Legacy Lee","email":"lee@taskdesk.dev","status":"INACTIVE"}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.status, EmployeeStatus::Inactive);
        assert!(employee.department.is_none());
    }
}
