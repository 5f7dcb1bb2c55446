//! Delete Account Use Case
//!
//! Admin-only removal of an account. Self-deletion is rejected regardless
//! of role. Deleting an id that is already gone is not an error: the
//! caller gets `Ok(false)` and the handler shows a generic failure flash.

use std::sync::Arc;

use crate::domain::entity::session::UserSnapshot;
use crate::domain::repository::UserRepository;
use crate::error::{AccountsError, AccountsResult};
use kernel::id::UserId;

/// Delete account use case
pub struct DeleteAccountUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> DeleteAccountUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Returns `true` iff a row was removed.
    pub async fn execute(&self, caller: &UserSnapshot, target: UserId) -> AccountsResult<bool> {
        // The route is behind the admin role guard; the rule is still
        // enforced here so the use case cannot be misused from elsewhere.
        if !caller.role.is_admin() {
            tracing::warn!(
                actor_id = %caller.id,
                target_id = %target,
                "Rejected account deletion: caller is not admin"
            );
            return Err(AccountsError::NotAuthorized);
        }

        if caller.id == target {
            tracing::warn!(actor_id = %caller.id, "Rejected self-deletion");
            return Err(AccountsError::SelfDeletion);
        }

        let removed = self.users.delete(target).await?;

        if removed {
            tracing::info!(
                actor_id = %caller.id,
                target_id = %target,
                "Account deleted"
            );
        }

        Ok(removed)
    }
}
