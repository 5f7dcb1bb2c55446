//! Form DTOs
//!
//! Deserialized from `application/x-www-form-urlencoded` bodies. Every
//! field defaults to empty so a missing input validates like a blank one
//! instead of failing body extraction.

use serde::Deserialize;

use crate::application::register::RegisterInput;
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::RawPassword,
};
use crate::error::{AccountsError, AccountsResult};

/// Login form
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub confirm_email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    /// Validate into domain values. The first violation wins; the handler
    /// flashes it and redirects back to the form.
    pub fn validate(self) -> AccountsResult<RegisterInput> {
        let name = PersonName::new(self.name)?;

        let email = Email::new(self.email)?;
        let confirm_email = Email::new(self.confirm_email).map_err(|_| {
            AccountsError::Validation("Please provide a valid confirmation email".to_string())
        })?;
        if email != confirm_email {
            return Err(AccountsError::Validation(
                "Email addresses do not match".to_string(),
            ));
        }

        if self.password != self.confirm_password {
            return Err(AccountsError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        let password = RawPassword::new(self.password)?;

        Ok(RegisterInput {
            name,
            email,
            password,
        })
    }
}

/// Account edit form
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccountForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UpdateAccountForm {
    pub fn validate(self) -> AccountsResult<(PersonName, Email)> {
        let name = PersonName::new(self.name)?;
        let email = Email::new(self.email)?;
        Ok((name, email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegisterForm {
        RegisterForm {
            name: "Alice Brown".to_string(),
            email: "alice@example.com".to_string(),
            confirm_email: "alice@example.com".to_string(),
            password: "Sturdy#Pass7".to_string(),
            confirm_password: "Sturdy#Pass7".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let input = valid_form().validate().unwrap();
        assert_eq!(input.name.as_str(), "Alice Brown");
        assert_eq!(input.email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_short_name_rejected() {
        let form = RegisterForm {
            name: "Al".to_string(),
            ..valid_form()
        };
        let err = form.validate().unwrap_err().to_string();
        assert!(err.contains("at least 7 characters"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let form = RegisterForm {
            email: "not-an-email".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_email_confirmation_mismatch() {
        let form = RegisterForm {
            confirm_email: "other@example.com".to_string(),
            ..valid_form()
        };
        let err = form.validate().unwrap_err().to_string();
        assert_eq!(err, "Email addresses do not match");
    }

    #[test]
    fn test_email_confirmation_is_case_insensitive() {
        let form = RegisterForm {
            confirm_email: "ALICE@EXAMPLE.COM".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_password_confirmation_mismatch() {
        let form = RegisterForm {
            confirm_password: "Different#7".to_string(),
            ..valid_form()
        };
        let err = form.validate().unwrap_err().to_string();
        assert_eq!(err, "Passwords do not match");
    }

    #[test]
    fn test_password_policy_enforced() {
        let form = RegisterForm {
            password: "plainpassword".to_string(),
            confirm_password: "plainpassword".to_string(),
            ..valid_form()
        };
        let err = form.validate().unwrap_err().to_string();
        assert!(err.contains("at least one number and one symbol"));
    }

    #[test]
    fn test_missing_fields_validate_like_blanks() {
        let form = RegisterForm {
            name: String::new(),
            email: String::new(),
            confirm_email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_update_form() {
        let form = UpdateAccountForm {
            name: "Alicia Brown".to_string(),
            email: "Alicia@Example.com".to_string(),
        };
        let (name, email) = form.validate().unwrap();
        assert_eq!(name.as_str(), "Alicia Brown");
        assert_eq!(email.as_str(), "alicia@example.com");

        let bad = UpdateAccountForm {
            name: "A".to_string(),
            email: "alicia@example.com".to_string(),
        };
        assert!(bad.validate().is_err());
    }
}
