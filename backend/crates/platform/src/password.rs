//! Password Hashing and Verification
//!
//! bcrypt-based password handling with:
//! - Fixed, configurable work factor (cost 12 by default)
//! - Random per-hash salt (two hashes of one password never match)
//! - Zeroization of clear text
//! - Constant-time comparison (delegated to `bcrypt`)
//!
//! Verification never fails loudly: a malformed digest is simply "no match",
//! so a corrupt row can never bypass the caller's access decision.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Work factor used when none is configured
pub const DEFAULT_COST: u32 = 12;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters long")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} bytes long")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(#[from] bcrypt::BcryptError),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Does not implement `Clone`
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Accept a new password (registration) after checking the policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self(raw);

        if candidate.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = candidate.char_count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        let byte_len = candidate.0.len();
        if byte_len > MAX_PASSWORD_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_BYTES,
                actual: byte_len,
            });
        }

        if candidate
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(candidate)
    }

    /// Wrap a login candidate as-is. Policy is not applied: a password
    /// accepted under an older policy must still be checkable.
    pub fn from_input(raw: String) -> Self {
        Self(raw)
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with a fresh random salt
    pub fn hash(&self, cost: u32) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::hash(self.as_bytes(), cost)?;
        Ok(HashedPassword { hash })
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

/// bcrypt digest in modular crypt format (`$2b$12$<salt><hash>`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Load a stored digest, checking its shape
    pub fn from_digest(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        if parse_cost(&hash).is_none() {
            return Err(PasswordHashError::InvalidHashFormat);
        }
        Ok(Self { hash })
    }

    /// Load a stored digest without checking it. A malformed value will
    /// simply never verify.
    pub fn from_db(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Work factor recorded in the digest
    pub fn cost(&self) -> Option<u32> {
        parse_cost(&self.hash)
    }

    /// Constant-time check of `password` against this digest.
    /// Malformed digests yield `false`.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        bcrypt::verify(password.as_bytes(), &self.hash).unwrap_or(false)
    }

    /// True when the digest was produced with a different work factor
    pub fn needs_rehash(&self, cost: u32) -> bool {
        self.cost() != Some(cost)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// `$2a$`, `$2b$`, `$2x$` or `$2y$`, two-digit cost, 53 chars of salt+hash
fn parse_cost(hash: &str) -> Option<u32> {
    if hash.len() != 60 || !hash.is_ascii() {
        return None;
    }

    let prefix = &hash[..4];
    if !matches!(prefix, "$2a$" | "$2b$" | "$2x$" | "$2y$") || &hash[6..7] != "$" {
        return None;
    }

    hash[4..6].parse().ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("abc12".to_string());
        assert_eq!(
            result.unwrap_err(),
            PasswordPolicyError::TooShort { min: 6, actual: 5 }
        );
    }

    #[test]
    fn test_password_min_length_accepted() {
        assert!(ClearTextPassword::new("abc123".to_string()).is_ok());
    }

    #[test]
    fn test_password_too_long() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_BYTES + 1));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::EmptyOrWhitespace);
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defg".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::InvalidCharacter);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 6 characters, 18 bytes
        assert!(ClearTextPassword::new("牛乳牛乳牛乳".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::from_input("correct horse".to_string());
        let hashed = password.hash(TEST_COST).unwrap();

        assert!(hashed.verify(&password));

        let wrong = ClearTextPassword::from_input("battery staple".to_string());
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_hash_is_salted() {
        let password = ClearTextPassword::from_input("same input".to_string());
        let first = password.hash(TEST_COST).unwrap();
        let second = password.hash(TEST_COST).unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify(&password));
        assert!(second.verify(&password));
    }

    #[test]
    fn test_digest_records_cost() {
        let password = ClearTextPassword::from_input("milk-run".to_string());
        let hashed = password.hash(TEST_COST).unwrap();

        assert_eq!(hashed.cost(), Some(TEST_COST));
        assert!(!hashed.needs_rehash(TEST_COST));
        assert!(hashed.needs_rehash(DEFAULT_COST));
    }

    #[test]
    fn test_digest_roundtrip_through_storage() {
        let password = ClearTextPassword::from_input("dairy-2024".to_string());
        let hashed = password.hash(TEST_COST).unwrap();

        let restored = HashedPassword::from_digest(hashed.as_str().to_string()).unwrap();
        assert!(restored.verify(&password));
    }

    #[test]
    fn test_malformed_digest_is_no_match() {
        assert!(matches!(
            HashedPassword::from_digest("not_a_valid_hash"),
            Err(PasswordHashError::InvalidHashFormat)
        ));

        let corrupt = HashedPassword::from_db("$2b$12$truncated");
        let password = ClearTextPassword::from_input("anything".to_string());
        assert!(!corrupt.verify(&password));
        assert_eq!(corrupt.cost(), None);
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        let password = ClearTextPassword::from_input("anything".to_string());
        assert!(matches!(
            password.hash(99),
            Err(PasswordHashError::HashingFailed(_))
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::from_input("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = password.hash(TEST_COST).unwrap();
        assert!(!format!("{:?}", hashed).contains("$2"));
    }
}
