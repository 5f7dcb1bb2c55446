//! User Entity
//!
//! A registered account as read from the credential store. The password
//! hash is deliberately not a field here: it only ever appears paired
//! with a user in the login lookup, and is dropped immediately after
//! verification.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::session::UserSnapshot;
use crate::domain::value_object::{email::Email, person_name::PersonName, user_role::UserRole};

#[derive(Debug, Clone)]
pub struct User {
    /// Database-assigned id
    pub id: UserId,
    /// Display name
    pub name: PersonName,
    /// Canonical (lowercase) email, unique case-insensitively
    pub email: Email,
    /// Role (Admin, User)
    pub role: UserRole,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The public fields cached into a session at login.
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            name: self.name.as_str().to_string(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
