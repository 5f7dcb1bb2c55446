use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role.
///
/// A closed enumeration: authorization decisions match on the variant,
/// never on a free-form string. The discriminants mirror the ids seeded
/// into the `roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum UserRole {
    Admin = 1,
    #[default]
    User = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(UserRole::Admin),
            2 => Some(UserRole::User),
            _ => None,
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(1), Some(UserRole::Admin));
        assert_eq!(UserRole::from_id(2), Some(UserRole::User));
        assert_eq!(UserRole::from_id(0), None);
        assert_eq!(UserRole::from_id(3), None);
    }

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("user"), Some(UserRole::User));
        assert_eq!(UserRole::from_code("superuser"), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::User.to_string(), "user");
    }

    #[test]
    fn test_user_role_checks() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
        assert_eq!(UserRole::default(), UserRole::User);
    }

    #[test]
    fn test_id_roundtrip() {
        for role in [UserRole::Admin, UserRole::User] {
            assert_eq!(UserRole::from_id(role.id()), Some(role));
            assert_eq!(UserRole::from_code(role.code()), Some(role));
        }
    }
}
