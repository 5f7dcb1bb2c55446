//! Password Hashing and Verification
//!
//! Argon2id hashing with a fixed work factor (the crate defaults), random
//! per-password salts, and an optional application-wide pepper.
//!
//! Two invariants the rest of the application relies on:
//! - the plaintext never leaves this module: it is zeroized on drop and
//!   redacted in `Debug` output;
//! - a malformed stored hash makes `verify` return `false`, it never
//!   surfaces as an error to the caller.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted at registration
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Symbols that satisfy the "at least one symbol" rule
pub const REQUIRED_SYMBOLS: &str = "!@#$%^&*";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters long")]
    TooShort { min: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters long")]
    TooLong { max: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty")]
    EmptyOrWhitespace,

    /// Password contains control characters
    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    /// Missing the required digit or symbol
    #[error("Password must contain at least one number and one symbol (!@#$%^&*)")]
    MissingDigitOrSymbol,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization.
///
/// Does not implement `Clone`, so accidental copies of the plaintext
/// cannot outlive the request that carried it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password candidate with full registration policy checks.
    ///
    /// Input is NFKC-normalized before validation; lengths are counted in
    /// Unicode code points, not bytes.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
            });
        }

        for ch in normalized.chars() {
            if ch.is_control() {
                return Err(PasswordPolicyError::InvalidCharacter);
            }
        }

        let has_digit = normalized.chars().any(|c| c.is_ascii_digit());
        let has_symbol = normalized.chars().any(|c| REQUIRED_SYMBOLS.contains(c));
        if !has_digit || !has_symbol {
            return Err(PasswordPolicyError::MissingDigitOrSymbol);
        }

        Ok(Self(normalized))
    }

    /// Wrap login input for verification against a stored hash.
    ///
    /// Only normalizes; the policy is a registration-time gate, and
    /// applying it here would lock out accounts created before a policy
    /// change. Callers reject empty input before reaching this point.
    pub fn for_verification(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    /// Get the password as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id.
    ///
    /// `pepper` is an optional application-wide secret appended to the
    /// password bytes before hashing; it must match at verification time.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let password_bytes = peppered(self.as_bytes(), pepper);

        let salt = SaltString::generate(&mut OsRng);

        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format.
///
/// The PHC string carries algorithm, parameters, salt, and digest, so
/// verification needs nothing but the stored column.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a stored hash from the database.
    ///
    /// No validation happens here: a corrupted column must degrade to a
    /// failed verification, not a load error.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash.
    ///
    /// Returns `false` for a wrong password, a malformed stored hash, or a
    /// pepper mismatch. Argon2 compares digests in constant time.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let password_bytes = peppered(password.as_bytes(), pepper);

        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

fn peppered(password: &[u8], pepper: Option<&[u8]>) -> Vec<u8> {
    match pepper {
        Some(p) => {
            let mut combined = password.to_vec();
            combined.extend_from_slice(p);
            combined
        }
        None => password.to_vec(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("a1!".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let mut long_password = "a1!".to_string();
        long_password.push_str(&"x".repeat(MAX_PASSWORD_LENGTH));
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_empty() {
        let result = ClearTextPassword::new("".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));

        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_requires_digit_and_symbol() {
        let result = ClearTextPassword::new("justletters".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::MissingDigitOrSymbol)
        ));

        let result = ClearTextPassword::new("letters123".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::MissingDigitOrSymbol)
        ));

        let result = ClearTextPassword::new("letters!!!".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::MissingDigitOrSymbol)
        ));

        assert!(ClearTextPassword::new("letters1!".to_string()).is_ok());
    }

    #[test]
    fn test_unicode_password() {
        let result = ClearTextPassword::new("пароль-надежный7!".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = password.hash(None).unwrap();

        assert!(hashed.verify(&password, None));

        let wrong_password = ClearTextPassword::for_verification("WrongPassword123!".to_string());
        assert!(!hashed.verify(&wrong_password, None));
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = ClearTextPassword::new("TestPassword123!".to_string()).unwrap();
        let pepper = b"application_pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_malformed_stored_hash_verifies_false() {
        let stored = HashedPassword::from_stored("not_a_valid_phc_string");
        let password = ClearTextPassword::for_verification("whatever123!".to_string());
        assert!(!stored.verify(&password, None));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = password.hash(None).unwrap();

        let phc_string = hashed.as_phc_string().to_string();
        let restored = HashedPassword::from_stored(phc_string);

        assert!(restored.verify(&password, None));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::for_verification("secret123!".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
