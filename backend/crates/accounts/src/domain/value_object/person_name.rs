//! Person Name Value Object

use crate::error::{AccountsError, AccountsResult};
use serde::{Deserialize, Serialize};

/// Minimum display-name length at registration
const NAME_MIN_LENGTH: usize = 7;

/// Maximum display-name length
const NAME_MAX_LENGTH: usize = 100;

/// A registrant's display name, trimmed and length-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(name: impl Into<String>) -> AccountsResult<Self> {
        let name = name.into().trim().to_string();

        let char_count = name.chars().count();

        if char_count < NAME_MIN_LENGTH {
            return Err(AccountsError::Validation(format!(
                "Name must be at least {} characters long",
                NAME_MIN_LENGTH
            )));
        }

        if char_count > NAME_MAX_LENGTH {
            return Err(AccountsError::Validation(format!(
                "Name must be at most {} characters long",
                NAME_MAX_LENGTH
            )));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_minimum_length() {
        assert!(PersonName::new("Al").is_err());
        assert!(PersonName::new("Alice B").is_ok());
    }

    #[test]
    fn test_name_trims_whitespace() {
        let name = PersonName::new("  Alice Brown  ").unwrap();
        assert_eq!(name.as_str(), "Alice Brown");
    }

    #[test]
    fn test_name_whitespace_only_rejected() {
        assert!(PersonName::new("          ").is_err());
    }

    #[test]
    fn test_name_maximum_length() {
        assert!(PersonName::new("x".repeat(101)).is_err());
        assert!(PersonName::new("x".repeat(100)).is_ok());
    }
}
