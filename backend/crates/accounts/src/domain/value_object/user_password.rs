//! User Password Value Object
//!
//! Domain wrappers around `platform::password`. `RawPassword` is the
//! short-lived plaintext (zeroized on drop); `StoredPassword` is the PHC
//! hash string that lives in the `users` table.

use crate::error::{AccountsError, AccountsResult};
use platform::password::{ClearTextPassword, HashedPassword};
use std::fmt;

/// Raw password from user input.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Registration-side constructor: applies the full password policy
    /// (length, at least one digit and one symbol).
    pub fn new(raw: String) -> AccountsResult<Self> {
        let clear_text = ClearTextPassword::new(raw)?;
        Ok(Self(clear_text))
    }

    /// Login-side constructor: normalizes only. The stored hash decides
    /// whether the password is right; rejecting by policy here would leak
    /// which inputs are even possible passwords.
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Hashed password as persisted in the credential store.
#[derive(Clone)]
pub struct StoredPassword(HashedPassword);

impl StoredPassword {
    /// Hash a raw password for storage.
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AccountsResult<Self> {
        let hashed = raw.inner().hash(pepper)?;
        Ok(Self(hashed))
    }

    /// Wrap a hash loaded from the database. Never validated here: a
    /// corrupted column degrades to a failed verification.
    pub fn from_db(hash: impl Into<String>) -> Self {
        Self(HashedPassword::from_stored(hash.into()))
    }

    /// Verify a candidate password. All failure modes (wrong password,
    /// malformed hash, pepper mismatch) return `false`.
    pub fn verify(&self, candidate: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(candidate.inner(), pepper)
    }

    /// PHC string for storage
    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StoredPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_applies_at_registration_only() {
        // Too short and missing digit/symbol: rejected at registration
        assert!(RawPassword::new("short".to_string()).is_err());
        assert!(RawPassword::new("longenoughbutplain".to_string()).is_err());
        assert!(RawPassword::new("longenough7!".to_string()).is_ok());

        // Login-side wrapper accepts anything; verification decides
        let _ = RawPassword::for_login("short".to_string());
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let raw = RawPassword::new("Sturdy#Pass7".to_string()).unwrap();
        let stored = StoredPassword::from_raw(&raw, None).unwrap();

        assert!(stored.verify(&raw, None));

        let wrong = RawPassword::for_login("Sturdy#Pass8".to_string());
        assert!(!stored.verify(&wrong, None));
    }

    #[test]
    fn test_corrupted_hash_fails_closed() {
        let stored = StoredPassword::from_db("garbage");
        let candidate = RawPassword::for_login("anything1!".to_string());
        assert!(!stored.verify(&candidate, None));
    }

    #[test]
    fn test_debug_never_shows_secret() {
        let raw = RawPassword::for_login("topsecret1!".to_string());
        assert!(!format!("{:?}", raw).contains("topsecret"));

        let stored = StoredPassword::from_db("$argon2id$fake");
        assert!(!format!("{:?}", stored).contains("argon2id"));
    }
}
