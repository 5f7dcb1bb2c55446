//! Accounts Error Types
//!
//! This module provides account-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Most variants never become HTTP error pages: handlers intercept them
//! and turn them into a flash message plus a redirect. The exceptions are
//! `UserNotFound` (the 404 page) and the store/hash faults that fall
//! through to the centralized 500 page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Account-specific result type alias
pub type AccountsResult<T> = Result<T, AccountsError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountsError {
    /// Malformed or missing form input; message is user-presentable
    #[error("{0}")]
    Validation(String),

    /// Bad credentials. Deliberately generic: the same failure for an
    /// unknown email and a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email already belongs to an account (case-insensitive)
    #[error("Account with email {0} already exists")]
    EmailTaken(String),

    /// Target account does not exist
    #[error("Account not found")]
    UserNotFound,

    /// Caller lacks the role or ownership the operation requires
    #[error("You do not have permission to perform this action")]
    NotAuthorized,

    /// An admin tried to delete their own account
    #[error("You cannot delete your own account")]
    SelfDeletion,

    /// Session token missing, malformed, tampered, or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Password hashing primitive failed
    #[error("Password hashing failed: {0}")]
    Hash(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountsError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountsError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountsError::EmailTaken(_) => StatusCode::CONFLICT,
            AccountsError::UserNotFound => StatusCode::NOT_FOUND,
            AccountsError::NotAuthorized | AccountsError::SelfDeletion => StatusCode::FORBIDDEN,
            AccountsError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AccountsError::Hash(_)
            | AccountsError::Database(_)
            | AccountsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountsError::Validation(_) => ErrorKind::BadRequest,
            AccountsError::InvalidCredentials | AccountsError::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            AccountsError::EmailTaken(_) => ErrorKind::Conflict,
            AccountsError::UserNotFound => ErrorKind::NotFound,
            AccountsError::NotAuthorized | AccountsError::SelfDeletion => ErrorKind::Forbidden,
            AccountsError::Hash(_)
            | AccountsError::Database(_)
            | AccountsError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// True for the store/hash faults the user should only ever see as a
    /// generic "try again" message.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            AccountsError::Hash(_) | AccountsError::Database(_) | AccountsError::Internal(_)
        )
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AccountsError::Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            AccountsError::Hash(msg) => {
                tracing::error!(message = %msg, "Password hashing error");
            }
            AccountsError::Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            AccountsError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AccountsError::NotAuthorized => {
                tracing::warn!("Unauthorized account operation");
            }
            _ => {
                tracing::debug!(error = %self, "Accounts error");
            }
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        self.log();
        // The store/hash detail stays in the log; the page shows the kind's
        // generic message only.
        if self.is_store_failure() {
            return AppError::internal("Something went wrong. Please try again later.")
                .into_response();
        }
        self.to_app_error().into_response()
    }
}

impl From<platform::password::PasswordHashError> for AccountsError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AccountsError::Hash(err.to_string())
    }
}

impl From<platform::password::PasswordPolicyError> for AccountsError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AccountsError::Validation(err.to_string())
    }
}
