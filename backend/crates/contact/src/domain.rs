//! Contact Domain
//!
//! Entity, form validation, and the repository trait.

use chrono::{DateTime, Utc};
use kernel::id::ContactMessageId;
use serde::Deserialize;

use crate::error::{ContactError, ContactResult};

/// Minimum subject length
const SUBJECT_MIN_LENGTH: usize = 2;

/// Minimum message length
const MESSAGE_MIN_LENGTH: usize = 10;

/// A stored contact-form submission
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Contact form
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    /// Validate into trimmed (subject, message) fields.
    pub fn validate(self) -> ContactResult<(String, String)> {
        let subject = self.subject.trim().to_string();
        let message = self.message.trim().to_string();

        if subject.chars().count() < SUBJECT_MIN_LENGTH {
            return Err(ContactError::Validation(format!(
                "Subject must be at least {} characters long",
                SUBJECT_MIN_LENGTH
            )));
        }

        if message.chars().count() < MESSAGE_MIN_LENGTH {
            return Err(ContactError::Validation(format!(
                "Message must be at least {} characters long",
                MESSAGE_MIN_LENGTH
            )));
        }

        Ok((subject, message))
    }
}

/// Contact store adapter
#[trait_variant::make(ContactRepository: Send)]
pub trait LocalContactRepository {
    /// Persist a submission.
    async fn save(&self, subject: &str, message: &str) -> ContactResult<ContactMessage>;

    /// All submissions, newest first.
    async fn list_all(&self) -> ContactResult<Vec<ContactMessage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_submission() {
        let form = ContactForm {
            subject: "Course question".to_string(),
            message: "Is CS 301 offered in the spring term?".to_string(),
        };
        let (subject, message) = form.validate().unwrap();
        assert_eq!(subject, "Course question");
        assert!(message.starts_with("Is CS 301"));
    }

    #[test]
    fn test_short_subject_rejected() {
        let form = ContactForm {
            subject: "x".to_string(),
            message: "long enough message".to_string(),
        };
        let err = form.validate().unwrap_err().to_string();
        assert!(err.contains("Subject must be at least 2"));
    }

    #[test]
    fn test_short_message_rejected() {
        let form = ContactForm {
            subject: "Hello".to_string(),
            message: "too short".to_string(),
        };
        let err = form.validate().unwrap_err().to_string();
        assert!(err.contains("Message must be at least 10"));
    }

    #[test]
    fn test_whitespace_trimmed_before_length_check() {
        let form = ContactForm {
            subject: "  ab  ".to_string(),
            message: "          x         ".to_string(),
        };
        assert!(form.validate().is_err());
    }
}
