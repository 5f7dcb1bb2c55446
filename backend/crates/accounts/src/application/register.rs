//! Register Use Case
//!
//! Creates a new account. Input arrives already validated into value
//! objects by the form layer; this use case owns the uniqueness check and
//! the hashing step.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::RawPassword,
    user_password::StoredPassword,
};
use crate::error::{AccountsError, AccountsResult};

/// Register input (validated form fields)
#[derive(Debug)]
pub struct RegisterInput {
    pub name: PersonName,
    pub email: Email,
    pub password: RawPassword,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    config: Arc<AccountsConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, config: Arc<AccountsConfig>) -> Self {
        Self { users, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccountsResult<User> {
        // Fast-path duplicate check for a precise message. Two concurrent
        // registrations can both pass it; the unique index behind
        // `create` is the authoritative signal and maps to the same
        // EmailTaken failure.
        if self.users.email_exists(&input.email).await? {
            tracing::info!(email = %input.email, "Registration attempt with existing email");
            return Err(AccountsError::EmailTaken(input.email.to_string()));
        }

        let password_hash = StoredPassword::from_raw(&input.password, self.config.pepper())?;

        let user = self
            .users
            .create(&input.name, &input.email, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(user)
    }
}
