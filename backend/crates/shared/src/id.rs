//! Common ID Types
//!
//! Type-safe wrappers around the `BIGSERIAL` record ids handed out by the
//! database. The wrapper prevents mixing up ids of different entities at
//! compile time while staying a plain `i64` on the wire and in SQL binds.

use std::fmt;
use std::marker::PhantomData;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Wrap a database-assigned id.
    pub fn from_i64(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the raw id for SQL binds and URLs.
    pub fn as_i64(&self) -> i64 {
        self.value
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for user account IDs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct User;

    /// Marker for contact-message IDs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ContactMessage;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type ContactMessageId = Id<markers::ContactMessage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_safety() {
        let user_id: UserId = Id::from_i64(1);
        let message_id: ContactMessageId = Id::from_i64(1);

        // Different marker types cannot be compared or mixed
        let _u: i64 = user_id.as_i64();
        let _m: i64 = message_id.as_i64();
    }

    #[test]
    fn test_id_roundtrip() {
        let id: UserId = Id::from_i64(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(UserId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }
}
