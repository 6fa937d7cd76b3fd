//! User roles.

use serde::{Deserialize, Serialize};

/// Role attached to an authenticated user.
///
/// The backend sends roles as upper-case strings. Anything it sends that this
/// client does not know is kept as [`Role::Unknown`] instead of failing to
/// decode, so the route guards can show a terminal error view for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Creates, assigns and deletes tasks; manages team members.
    Admin,
    /// Views and works on tasks assigned to them.
    Member,
    /// Legacy role from the employee-directory era. Treated like `Member`.
    Employee,
    /// A role string the client does not recognise.
    Unknown(String),
}

impl Role {
    /// Returns the wire representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
            Self::Employee => "EMPLOYEE",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether this role works on assigned tasks (member dashboard).
    #[must_use]
    pub const fn is_member_like(&self) -> bool {
        matches!(self, Self::Member | Self::Employee)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ADMIN" => Self::Admin,
            "MEMBER" => Self::Member,
            "EMPLOYEE" => Self::Employee,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.trim().to_ascii_uppercase()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_roundtrip_through_json() {
        for (role, wire) in [
            (Role::Admin, "\"ADMIN\""),
            (Role::Member, "\"MEMBER\""),
            (Role::Employee, "\"EMPLOYEE\""),
        ] {
            assert_eq!(serde_json::to_string(&role).unwrap(), wire);
            assert_eq!(serde_json::from_str::<Role>(wire).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_preserved() {
        let role: Role = serde_json::from_str("\"AUDITOR\"").unwrap();
        assert_eq!(role, Role::Unknown("AUDITOR".to_owned()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"AUDITOR\"");
    }

    #[test]
    fn test_member_like() {
        assert!(Role::Member.is_member_like());
        assert!(Role::Employee.is_member_like());
        assert!(!Role::Admin.is_member_like());
        assert!(!Role::Unknown("GUEST".to_owned()).is_member_like());
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    }
}
