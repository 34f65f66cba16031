//! Credential checks
//!
//! bcrypt is CPU-bound, so hashing and verification run on the blocking
//! pool instead of an async worker.

use std::sync::{Arc, OnceLock};

use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Hash a new password at `cost`
pub async fn hash_password(raw: RawPassword, cost: u32) -> AuthResult<UserPassword> {
    tokio::task::spawn_blocking(move || UserPassword::from_raw(&raw, cost))
        .await
        .map_err(|e| AuthError::Internal(format!("Hashing task failed: {e}")))?
        .map_err(AuthError::from)
}

/// Check `raw` against `stored`. A task failure counts as no match.
pub async fn verify_password(stored: UserPassword, raw: RawPassword) -> bool {
    tokio::task::spawn_blocking(move || stored.verify(&raw))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            false
        })
}

/// Digest used to burn a bcrypt verification when there is nothing real
/// to check against, so a login for an unknown email costs the same as a
/// wrong password.
#[derive(Clone)]
pub struct TimingGuard {
    cost: u32,
    digest: Arc<OnceLock<Option<UserPassword>>>,
}

const DUMMY_PASSWORD: &str = "timing-guard-placeholder";

impl TimingGuard {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            digest: Arc::new(OnceLock::new()),
        }
    }

    /// Run one verification against the dummy digest and discard the result
    pub async fn burn(&self, raw: RawPassword) {
        let guard = self.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            if let Some(digest) = guard.digest() {
                let _ = digest.verify(&raw);
            }
        })
        .await;

        if let Err(e) = outcome {
            tracing::error!(error = %e, "Timing guard task failed");
        }
    }

    fn digest(&self) -> Option<&UserPassword> {
        self.digest
            .get_or_init(|| {
                let raw = RawPassword::candidate(DUMMY_PASSWORD.to_string());
                UserPassword::from_raw(&raw, self.cost)
                    .inspect_err(|e| tracing::error!(error = %e, "Failed to build timing guard digest"))
                    .ok()
            })
            .as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let stored = hash_password(RawPassword::new("shamba123".into()).unwrap(), TEST_COST)
            .await
            .unwrap();

        assert!(verify_password(stored.clone(), RawPassword::candidate("shamba123".into())).await);
        assert!(!verify_password(stored, RawPassword::candidate("shamba124".into())).await);
    }

    #[tokio::test]
    async fn test_timing_guard_builds_digest_once() {
        let guard = TimingGuard::new(TEST_COST);
        guard.burn(RawPassword::candidate("x".into())).await;
        let first = guard.digest().map(|d| d.as_str().to_string());
        guard.burn(RawPassword::candidate("y".into())).await;

        assert!(first.is_some());
        assert_eq!(first, guard.digest().map(|d| d.as_str().to_string()));
    }
}
