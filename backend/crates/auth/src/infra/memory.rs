//! In-Memory Repository
//!
//! Same contract as the PostgreSQL store, including the unique email and
//! phone constraints. Check-and-insert happens under one write lock.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{CooperativeId, UserId};
use tokio::sync::RwLock;

use crate::domain::entity::{cooperative::Cooperative, user::User};
use crate::domain::repository::{CooperativeRepository, HealthCheck, UserRepository};
use crate::domain::value_object::{email::Email, phone_number::PhoneNumber};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    cooperatives: Arc<RwLock<HashMap<CooperativeId, Cooperative>>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add reference data
    pub async fn insert_cooperative(&self, cooperative: Cooperative) {
        self.cooperatives
            .write()
            .await
            .insert(cooperative.cooperative_id, cooperative);
    }

    /// Store a user as-is, bypassing registration (seeding staff accounts)
    pub async fn insert_user(&self, user: User) -> AuthResult<()> {
        self.create(&user).await
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        let taken = users.values().any(|u| {
            u.user_id == user.user_id
                || u.email == user.email
                || u.phone_number == user.phone_number
        });
        if taken {
            return Err(AuthError::DuplicateUser);
        }

        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn exists_by_email_or_phone(
        &self,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> AuthResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| &u.email == email || &u.phone_number == phone_number))
    }

    async fn exists_by_phone_excluding(
        &self,
        phone_number: &PhoneNumber,
        user_id: &UserId,
    ) -> AuthResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| &u.phone_number == phone_number && &u.user_id != user_id))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.phone_number == user.phone_number && u.user_id != user.user_id)
        {
            return Err(AuthError::PhoneNumberTaken);
        }

        match users.get_mut(&user.user_id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(AuthError::Internal(format!(
                "Update for unknown user {}",
                user.user_id
            ))),
        }
    }

    async fn list_by_cooperative(&self, cooperative_id: &CooperativeId) -> AuthResult<Vec<User>> {
        let mut members: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.belongs_to(*cooperative_id))
            .cloned()
            .collect();
        members.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.user_id.as_uuid().cmp(b.user_id.as_uuid()))
        });
        Ok(members)
    }
}

impl CooperativeRepository for InMemoryAuthRepository {
    async fn find_cooperative(
        &self,
        cooperative_id: &CooperativeId,
    ) -> AuthResult<Option<Cooperative>> {
        Ok(self.cooperatives.read().await.get(cooperative_id).cloned())
    }
}

impl HealthCheck for InMemoryAuthRepository {
    async fn ping(&self) -> AuthResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::NewUser;
    use crate::domain::value_object::{person_name::PersonName, user_password::UserPassword};

    fn user(email: &str, phone: &str) -> User {
        User::register(NewUser {
            email: Email::new(email).unwrap(),
            phone_number: PhoneNumber::new(phone).unwrap(),
            first_name: PersonName::new("Test", "First name").unwrap(),
            last_name: PersonName::new("User", "Last name").unwrap(),
            cooperative_id: None,
            password_hash: UserPassword::from_db("digest"),
        })
    }

    #[tokio::test]
    async fn test_unique_email_and_phone() {
        let repo = InMemoryAuthRepository::new();
        repo.create(&user("a@example.com", "0700000001")).await.unwrap();

        let dup_email = repo.create(&user("a@example.com", "0700000002")).await;
        assert!(matches!(dup_email, Err(AuthError::DuplicateUser)));

        let dup_phone = repo.create(&user("b@example.com", "0700000001")).await;
        assert!(matches!(dup_phone, Err(AuthError::DuplicateUser)));

        assert_eq!(repo.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_phone() {
        let repo = InMemoryAuthRepository::new();
        let first = user("a@example.com", "0700000001");
        let mut second = user("b@example.com", "0700000002");
        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();

        second.set_phone_number(PhoneNumber::new("0700000001").unwrap());
        assert!(matches!(
            repo.update(&second).await,
            Err(AuthError::PhoneNumberTaken)
        ));
    }

    #[tokio::test]
    async fn test_list_by_cooperative() {
        let repo = InMemoryAuthRepository::new();
        let coop = Cooperative::new("Kiambu Dairy", "Kiambu");
        let coop_id = coop.cooperative_id;
        repo.insert_cooperative(coop).await;

        let mut member = user("m@example.com", "0700000003");
        member.cooperative_id = Some(coop_id);
        repo.create(&member).await.unwrap();
        repo.create(&user("n@example.com", "0700000004")).await.unwrap();

        let members = repo.list_by_cooperative(&coop_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, member.user_id);
    }
}
