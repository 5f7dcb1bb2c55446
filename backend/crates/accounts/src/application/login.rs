//! Login Use Case
//!
//! Verifies credentials and produces the session snapshot. The failure
//! for an unknown email and for a wrong password is the same
//! `InvalidCredentials`, so responses never reveal whether an account
//! exists.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::entity::session::UserSnapshot;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AccountsError, AccountsResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    config: Arc<AccountsConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, config: Arc<AccountsConfig>) -> Self {
        Self { users, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AccountsResult<UserSnapshot> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AccountsError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        // A malformed email cannot belong to an account; fail the same
        // way a wrong password does.
        let email =
            Email::new(input.email).map_err(|_| AccountsError::InvalidCredentials)?;

        let (user, stored_hash) = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AccountsError::InvalidCredentials)?;

        let candidate = RawPassword::for_login(input.password);

        if !stored_hash.verify(&candidate, self.config.pepper()) {
            return Err(AccountsError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(user.snapshot())
    }
}
