//! Edit Account Use Case
//!
//! Applies a name/email change to a target account. Target existence is
//! established before, and independently of, the authorization decision:
//! a missing account is NotFound even for a caller who could never have
//! edited it.

use std::sync::Arc;

use crate::domain::entity::session::UserSnapshot;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, person_name::PersonName};
use crate::error::{AccountsError, AccountsResult};
use kernel::id::UserId;

/// Successful edit result
pub struct EditOutcome {
    pub user: User,
    /// Whether the caller edited their own account (the session snapshot
    /// must then be refreshed)
    pub self_edit: bool,
}

/// Edit account use case
pub struct EditAccountUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> EditAccountUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Load the target account for the edit form, enforcing the same
    /// not-found-then-authorization order as the update itself.
    pub async fn load(&self, caller: &UserSnapshot, target: UserId) -> AccountsResult<User> {
        let user = self
            .users
            .find_by_id(target)
            .await?
            .ok_or(AccountsError::UserNotFound)?;

        if !caller.may_edit(user.id) {
            tracing::warn!(
                actor_id = %caller.id,
                target_id = %target,
                "Rejected account edit: not owner, not admin"
            );
            return Err(AccountsError::NotAuthorized);
        }

        Ok(user)
    }

    pub async fn execute(
        &self,
        caller: &UserSnapshot,
        target: UserId,
        name: PersonName,
        email: Email,
    ) -> AccountsResult<EditOutcome> {
        let current = self.load(caller, target).await?;

        // The new email may collide only with a *different* account;
        // keeping one's own email is always allowed.
        if let Some((owner, _)) = self.users.find_by_email(&email).await? {
            if owner.id != current.id {
                return Err(AccountsError::EmailTaken(email.to_string()));
            }
        }

        let updated = self
            .users
            .update(target, &name, &email)
            .await?
            .ok_or(AccountsError::UserNotFound)?;

        tracing::info!(
            actor_id = %caller.id,
            target_id = %target,
            "Account updated"
        );

        Ok(EditOutcome {
            self_edit: caller.id == target,
            user: updated,
        })
    }
}
