//! Login Use Case
//!
//! Verifies email and password and issues an access token.

use std::sync::Arc;

use platform::token::TokenService;

use crate::application::config::AuthConfig;
use crate::application::credentials::{hash_password, verify_password, TimingGuard};
use crate::application::profile::load_profile;
use crate::domain::entity::{user::User, user_profile::UserProfile};
use crate::domain::repository::{CooperativeRepository, UserRepository};
use crate::domain::value_object::{
    access_claims::AccessClaims, email::Email, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Login input (both fields already checked for presence)
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub profile: UserProfile,
    pub token: String,
}

pub struct LoginUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: TokenService,
    timing_guard: TimingGuard,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    pub fn new(
        repo: Arc<R>,
        config: Arc<AuthConfig>,
        tokens: TokenService,
        timing_guard: TimingGuard,
    ) -> Self {
        Self {
            repo,
            config,
            tokens,
            timing_guard,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::normalize(&input.email);

        let Some(user) = self.repo.find_by_email(&email).await? else {
            self.timing_guard.burn(RawPassword::candidate(input.password)).await;
            return Err(AuthError::InvalidCredentials);
        };

        let Some(stored) = user.password_hash.clone() else {
            tracing::warn!(user_id = %user.user_id, "Login for account without a password");
            self.timing_guard.burn(RawPassword::candidate(input.password)).await;
            return Err(AuthError::InvalidCredentials);
        };

        // Keep a second copy of the plaintext only when a rehash will need it
        let retained = stored
            .needs_rehash(self.config.bcrypt_cost)
            .then(|| RawPassword::candidate(input.password.clone()));
        let verified = verify_password(stored, RawPassword::candidate(input.password)).await;

        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        let user = match retained {
            Some(raw) => self.upgrade_digest(user, raw).await,
            None => user,
        };

        let token = self.tokens.issue(AccessClaims::for_user(&user))?;
        let profile = load_profile(self.repo.as_ref(), user).await?;

        tracing::info!(
            user_id = %profile.user.user_id,
            role = %profile.user.user_role,
            "User logged in"
        );

        Ok(LoginOutput { profile, token })
    }

    /// Re-hash at the configured cost. Failure is logged; the login stands.
    async fn upgrade_digest(&self, mut user: User, raw: RawPassword) -> User {
        let digest = match hash_password(raw, self.config.bcrypt_cost).await {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!(user_id = %user.user_id, error = %e, "Password rehash failed");
                return user;
            }
        };

        let previous = user.clone();
        user.set_password_hash(digest);
        match self.repo.update(&user).await {
            Ok(()) => {
                tracing::info!(user_id = %user.user_id, "Password digest upgraded");
                user
            }
            Err(e) => {
                tracing::warn!(user_id = %user.user_id, error = %e, "Password rehash not saved");
                previous
            }
        }
    }
}
