//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer. Every operation reports failure as a typed
//! result; nothing here panics or leaks a raw driver error upward.

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::StoredPassword,
};
use crate::error::AccountsResult;
use chrono::{DateTime, Utc};
use kernel::id::UserId;
use uuid::Uuid;

/// Credential store adapter
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find a user by email, case-insensitively, together with the stored
    /// password hash for login verification.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> AccountsResult<Option<(User, StoredPassword)>>;

    /// Check if an email is already registered (case-insensitive).
    ///
    /// This is the fast-path pre-check; the unique index on the store is
    /// the authoritative uniqueness signal.
    async fn email_exists(&self, email: &Email) -> AccountsResult<bool>;

    /// Create a user with the default role. Returns the stored row
    /// without the hash. A concurrent duplicate registration surfaces as
    /// the email-taken failure via the store's unique index.
    async fn create(
        &self,
        name: &PersonName,
        email: &Email,
        password_hash: &StoredPassword,
    ) -> AccountsResult<User>;

    /// All users, newest first, without hashes.
    async fn list_all(&self) -> AccountsResult<Vec<User>>;

    /// Find user by id, joined with role.
    async fn find_by_id(&self, id: UserId) -> AccountsResult<Option<User>>;

    /// Update name and email. `None` when no such row.
    async fn update(
        &self,
        id: UserId,
        name: &PersonName,
        email: &Email,
    ) -> AccountsResult<Option<User>>;

    /// Delete a user. `true` iff a row was removed.
    async fn delete(&self, id: UserId) -> AccountsResult<bool>;
}

/// Session store
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session row.
    async fn create_session(&self, session: &Session) -> AccountsResult<()>;

    /// Find a live session by id. Expired sessions are absent.
    async fn find_session(&self, session_id: Uuid) -> AccountsResult<Option<Session>>;

    /// Persist snapshot/flash changes (last write wins).
    async fn update_session(&self, session: &Session) -> AccountsResult<()>;

    /// Bump last-activity without touching snapshot or flash.
    async fn touch_session(
        &self,
        session_id: Uuid,
        last_activity_at: DateTime<Utc>,
    ) -> AccountsResult<()>;

    /// Delete a session row.
    async fn delete_session(&self, session_id: Uuid) -> AccountsResult<()>;

    /// Remove expired session rows; returns how many were swept.
    async fn cleanup_expired(&self) -> AccountsResult<u64>;
}
