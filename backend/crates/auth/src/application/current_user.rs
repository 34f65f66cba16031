//! Current User Use Case
//!
//! Resolves verified token claims to the stored user.

use std::sync::Arc;

use crate::application::profile::load_profile;
use crate::domain::entity::user_profile::UserProfile;
use crate::domain::repository::{CooperativeRepository, UserRepository};
use crate::domain::value_object::access_claims::AccessClaims;
use crate::error::{AuthError, AuthResult};

pub struct CurrentUserUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    repo: Arc<R>,
}

impl<R> CurrentUserUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// A valid token whose user no longer exists is treated as unauthenticated
    pub async fn execute(&self, claims: &AccessClaims) -> AuthResult<UserProfile> {
        let user = self
            .repo
            .find_by_id(&claims.user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %claims.user_id, "Token for unknown user");
                AuthError::Unauthenticated
            })?;

        load_profile(self.repo.as_ref(), user).await
    }
}
