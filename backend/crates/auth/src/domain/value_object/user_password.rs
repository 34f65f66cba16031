//! User Password Value Object
//!
//! Domain wrappers over `platform::password`: `RawPassword` for what the
//! client sent, `UserPassword` for the bcrypt digest that is stored.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Password from a request body. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A new password chosen at registration; the policy applies
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { .. } | PasswordPolicyError::TooLong { .. } => {
                AppError::bad_request(e.to_string())
            }
            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password cannot be empty")
            }
            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// A login candidate, taken as-is
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::from_input(raw))
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

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Stored bcrypt digest
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash with a fresh salt at the given bcrypt cost
    pub fn from_raw(raw: &RawPassword, cost: u32) -> AppResult<Self> {
        let hashed = raw
            .inner()
            .hash(cost)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))?;
        Ok(Self(hashed))
    }

    pub fn from_db(hash: impl Into<String>) -> Self {
        Self(HashedPassword::from_db(hash))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(raw.inner())
    }

    /// Stored at a different cost than the current configuration
    pub fn needs_rehash(&self, cost: u32) -> bool {
        self.0.needs_rehash(cost)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_policy_messages() {
        let err = RawPassword::new("abc".into()).unwrap_err();
        assert_eq!(err.message(), "Password must be at least 6 characters long");

        let err = RawPassword::new("      ".into()).unwrap_err();
        assert_eq!(err.message(), "Password cannot be empty");
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("maziwa-safi".into()).unwrap();
        let stored = UserPassword::from_raw(&raw, TEST_COST).unwrap();

        assert!(stored.verify(&RawPassword::candidate("maziwa-safi".into())));
        assert!(!stored.verify(&RawPassword::candidate("maziwa-chafu".into())));
        assert!(!stored.needs_rehash(TEST_COST));
        assert!(stored.needs_rehash(TEST_COST + 1));
    }

    #[test]
    fn test_corrupt_digest_never_verifies() {
        let stored = UserPassword::from_db("not-a-bcrypt-digest");
        assert!(!stored.verify(&RawPassword::candidate("anything".into())));
    }

    #[test]
    fn test_debug_redacted() {
        let raw = RawPassword::candidate("hunter22".into());
        assert!(!format!("{raw:?}").contains("hunter22"));
    }
}
