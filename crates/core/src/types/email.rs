//! Email address type.
//!
//! Emails are the login identifier for users and the uniqueness key for
//! legacy employee records, so both the login and registration forms check
//! them before anything is sent to the backend.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty or only whitespace.
    #[error("Email is required")]
    Empty,
    /// The input is too long.
    #[error("Email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not shaped like `local@domain`.
    #[error("Please enter a valid email address")]
    Malformed,
}

/// An email address, trimmed and checked for a `local@domain` shape.
///
/// ## Examples
///
/// ```
/// use taskdesk_core::Email;
///
/// assert!(Email::parse("admin@taskdesk.dev").is_ok());
/// assert!(Email::parse("  member@taskdesk.dev ").is_ok());
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("two@@ats.dev").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from user input.
    ///
    /// Surrounding whitespace is removed before validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than 254
    /// characters, or does not contain exactly one `@` with text on both sides.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        match s.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_input() {
        let email = Email::parse("  member@taskdesk.dev\n").unwrap();
        assert_eq!(email.as_str(), "member@taskdesk.dev");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@taskdesk.dev", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["no-at-symbol", "@taskdesk.dev", "user@", "a@b@c"] {
            assert_eq!(Email::parse(input), Err(EmailError::Malformed), "{input}");
        }
    }

    #[test]
    fn test_domain() {
        let email = Email::parse("admin@taskdesk.dev").unwrap();
        assert_eq!(email.domain(), "taskdesk.dev");
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(EmailError::Empty.to_string(), "Email is required");
        assert_eq!(
            EmailError::Malformed.to_string(),
            "Please enter a valid email address"
        );
    }
}
