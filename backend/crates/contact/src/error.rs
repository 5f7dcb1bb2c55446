//! Contact Error Types

use thiserror::Error;

/// Contact-specific result type alias
pub type ContactResult<T> = Result<T, ContactError>;

/// Contact-specific error variants
#[derive(Debug, Error)]
pub enum ContactError {
    /// Malformed or missing form input; message is user-presentable
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ContactError {
    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            ContactError::Database(e) => {
                tracing::error!(error = %e, "Contact database error");
            }
            ContactError::Validation(msg) => {
                tracing::debug!(message = %msg, "Contact validation error");
            }
        }
    }
}
