//! Email Value Object
//!
//! A validated, canonicalized email address. The canonical form is
//! trimmed and lowercased, so equality and uniqueness are case-insensitive
//! by construction: `Email::new("A@X.com")` and `Email::new("a@x.com")`
//! are the same value.

use crate::error::{AccountsError, AccountsResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl Into<String>) -> AccountsResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AccountsError::Validation(
                "Email cannot be empty".to_string(),
            ));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AccountsError::Validation(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(AccountsError::Validation(
                "Please provide a valid email address".to_string(),
            ));
        }

        Ok(Self(email))
    }

    /// Basic email format validation
    fn is_valid_format(email: &str) -> bool {
        // Must contain exactly one @
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 {
            return false;
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() || local.len() > 64 {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        if domain.starts_with('.') || domain.ends_with('.') {
            return false;
        }
        if domain.starts_with('-') || domain.ends_with('-') {
            return false;
        }

        true
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Get the canonical (lowercase) form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = AccountsError;

    fn from_str(s: &str) -> AccountsResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("user@example.com").is_ok());
        assert!(Email::new("User@Example.COM").is_ok());
        assert!(Email::new("user.name@campus.example.edu").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("userexample.com").is_err());
        assert!(Email::new("user@").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@@example.com").is_err());
        assert!(Email::new("user@example").is_err());
    }

    #[test]
    fn test_email_case_insensitive_equality() {
        let lower = Email::new("alice@example.com").unwrap();
        let upper = Email::new("ALICE@EXAMPLE.COM").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_trims_whitespace() {
        let email = Email::new("  alice@example.com  ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }
}
