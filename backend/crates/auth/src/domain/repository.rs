//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use kernel::id::{CooperativeId, UserId};

use crate::domain::entity::{cooperative::Cooperative, user::User};
use crate::domain::value_object::{email::Email, phone_number::PhoneNumber};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. A unique violation on email or phone reports
    /// `AuthError::DuplicateUser`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Lookup by normalized email
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    async fn exists_by_email_or_phone(
        &self,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AuthResult<bool>;

    /// Phone number held by any user other than `user_id`
    async fn exists_by_phone_excluding(
        &self,
        phone_number: &PhoneNumber,
        user_id: &UserId,
    ) -> AuthResult<bool>;

    /// Persist profile fields, digest and `updated_at`
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Members of a cooperative, oldest first
    async fn list_by_cooperative(&self, cooperative_id: &CooperativeId) -> AuthResult<Vec<User>>;
}

/// Cooperative reference data
#[trait_variant::make(CooperativeRepository: Send)]
pub trait LocalCooperativeRepository {
    async fn find_cooperative(
        &self,
        cooperative_id: &CooperativeId,
    ) -> AuthResult<Option<Cooperative>>;
}

/// Store liveness
#[trait_variant::make(HealthCheck: Send)]
pub trait LocalHealthCheck {
    async fn ping(&self) -> AuthResult<()>;
}

/// Everything the HTTP layer needs from a store
pub trait AuthStore:
    UserRepository + CooperativeRepository + HealthCheck + Clone + Send + Sync + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository + CooperativeRepository + HealthCheck + Clone + Send + Sync + 'static
{
}
