//! Update Profile Use Case
//!
//! Partial update of the caller's own name and phone number.

use std::sync::Arc;

use crate::application::profile::load_profile;
use crate::domain::entity::user_profile::UserProfile;
use crate::domain::repository::{CooperativeRepository, UserRepository};
use crate::domain::value_object::{
    access_claims::AccessClaims, person_name::PersonName, phone_number::PhoneNumber,
};
use crate::error::{AuthError, AuthResult};

/// Absent fields are left unchanged
#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

pub struct UpdateProfileUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        claims: &AccessClaims,
        input: UpdateProfileInput,
    ) -> AuthResult<UserProfile> {
        let first_name = input
            .first_name
            .map(|v| PersonName::new(v, "First name"))
            .transpose()?;
        let last_name = input
            .last_name
            .map(|v| PersonName::new(v, "Last name"))
            .transpose()?;
        let phone_number = input.phone_number.map(PhoneNumber::new).transpose()?;

        let mut user = self
            .repo
            .find_by_id(&claims.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        let mut changed = false;

        if let Some(name) = first_name.filter(|n| *n != user.first_name) {
            user.set_first_name(name);
            changed = true;
        }

        if let Some(name) = last_name.filter(|n| *n != user.last_name) {
            user.set_last_name(name);
            changed = true;
        }

        if let Some(phone) = phone_number.filter(|p| *p != user.phone_number) {
            if self
                .repo
                .exists_by_phone_excluding(&phone, &user.user_id)
                .await?
            {
                return Err(AuthError::PhoneNumberTaken);
            }
            user.set_phone_number(phone);
            changed = true;
        }

        if changed {
            self.repo.update(&user).await?;
            tracing::info!(user_id = %user.user_id, "Profile updated");
        }

        load_profile(self.repo.as_ref(), user).await
    }
}
