//! Session Entity
//!
//! A server-side session row referenced by an HMAC-signed cookie token.
//! Sessions start anonymous (they exist as soon as something needs to be
//! remembered across a redirect, usually a flash message); login swaps in
//! a fresh session carrying the user snapshot; logout deletes the row.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_role::UserRole};

/// Cached public fields of the authenticated user.
///
/// Held in the session so ordinary page loads need no `users` lookup.
/// Kept consistent with the store on self-edit (see
/// [`Session::refresh_snapshot`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
}

impl UserSnapshot {
    /// Edit authorization: self or admin.
    pub fn may_edit(&self, target: UserId) -> bool {
        self.id == target || self.role.is_admin()
    }

    /// Delete authorization: admin, and never the caller's own account.
    pub fn may_delete(&self, target: UserId) -> bool {
        self.role.is_admin() && self.id != target
    }
}

/// One-shot notice shown on the next rendered page, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum FlashKind {
    Success = 1,
    Error = 2,
}

impl FlashKind {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(FlashKind::Success),
            2 => Some(FlashKind::Error),
            _ => None,
        }
    }

    /// CSS class hook for the flash banner
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4); the cookie carries it HMAC-signed
    pub session_id: Uuid,
    /// Authenticated user snapshot; `None` while anonymous
    pub user: Option<UserSnapshot>,
    /// Pending one-shot flash message
    pub flash: Option<Flash>,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session.
    ///
    /// TTL is provided by the application layer (config), not hard-coded
    /// here.
    pub fn new(user: Option<UserSnapshot>, flash: Option<Flash>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user,
            flash,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Whether a user is attached
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Queue a flash message, replacing any pending one.
    pub fn set_flash(&mut self, flash: Flash) {
        self.flash = Some(flash);
    }

    /// Consume the pending flash message. Callers persist the session
    /// afterwards so the message really is one-shot.
    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }

    /// Rewrite the cached snapshot after the user edited their own
    /// account, so pages reflect the new name/email without re-login.
    pub fn refresh_snapshot(&mut self, user: &User) {
        if let Some(snapshot) = &self.user {
            if snapshot.id == user.id {
                self.user = Some(user.snapshot());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::person_name::PersonName;
    use kernel::id::Id;

    fn snapshot(id: i64, role: UserRole) -> UserSnapshot {
        UserSnapshot {
            id: Id::from_i64(id),
            name: "Alice Brown".to_string(),
            email: Email::from_db("alice@example.com"),
            role,
        }
    }

    fn user(id: i64, name: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: Id::from_i64(id),
            name: PersonName::from_db(name),
            email: Email::from_db(email),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_may_edit_self_or_admin() {
        let plain = snapshot(2, UserRole::User);
        assert!(plain.may_edit(Id::from_i64(2)));
        assert!(!plain.may_edit(Id::from_i64(3)));

        let admin = snapshot(1, UserRole::Admin);
        assert!(admin.may_edit(Id::from_i64(1)));
        assert!(admin.may_edit(Id::from_i64(3)));
    }

    #[test]
    fn test_may_delete_admin_only_never_self() {
        let plain = snapshot(2, UserRole::User);
        assert!(!plain.may_delete(Id::from_i64(3)));

        let admin = snapshot(1, UserRole::Admin);
        assert!(admin.may_delete(Id::from_i64(3)));
        assert!(!admin.may_delete(Id::from_i64(1)));
    }

    #[test]
    fn test_flash_is_one_shot() {
        let mut session = Session::new(None, None, Duration::hours(1));
        session.set_flash(Flash::error("You must be logged in to access this page."));

        let taken = session.take_flash().unwrap();
        assert_eq!(taken.kind, FlashKind::Error);
        assert!(session.take_flash().is_none());
    }

    #[test]
    fn test_refresh_snapshot_updates_matching_user() {
        let mut session = Session::new(Some(snapshot(2, UserRole::User)), None, Duration::hours(1));

        let edited = user(2, "Alicia Brown", "alicia@example.com");
        session.refresh_snapshot(&edited);

        let current = session.user.as_ref().unwrap();
        assert_eq!(current.name, "Alicia Brown");
        assert_eq!(current.email.as_str(), "alicia@example.com");
    }

    #[test]
    fn test_refresh_snapshot_ignores_other_user() {
        let mut session = Session::new(Some(snapshot(2, UserRole::User)), None, Duration::hours(1));

        let other = user(3, "Someone Else", "else@example.com");
        session.refresh_snapshot(&other);

        assert_eq!(session.user.as_ref().unwrap().name, "Alice Brown");
    }

    #[test]
    fn test_fresh_session_not_expired() {
        let session = Session::new(None, None, Duration::hours(1));
        assert!(!session.is_expired());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_expired_session() {
        let session = Session::new(None, None, Duration::milliseconds(-1));
        assert!(session.is_expired());
    }

    #[test]
    fn test_flash_kind_roundtrip() {
        for kind in [FlashKind::Success, FlashKind::Error] {
            assert_eq!(FlashKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(FlashKind::from_id(0), None);
    }
}
