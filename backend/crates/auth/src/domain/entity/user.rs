//! User Entity
//!
//! Account record. Created at registration, changed by profile updates,
//! never hard-deleted.

use chrono::{DateTime, Utc};
use kernel::id::{CooperativeId, UserId};
use kernel::role::{HasRole, UserRole};

use crate::domain::value_object::{
    email::Email, person_name::PersonName, phone_number::PhoneNumber,
    user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, lower-cased
    pub email: Email,
    /// Unique
    pub phone_number: PhoneNumber,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub user_role: UserRole,
    pub cooperative_id: Option<CooperativeId>,
    /// `None` for rows created without a password; such users cannot log in
    pub password_hash: Option<UserPassword>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted at registration, already validated
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub cooperative_id: Option<CooperativeId>,
    pub password_hash: UserPassword,
}

impl User {
    /// Self-registered accounts always start as farmers
    pub fn register(new_user: NewUser) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email: new_user.email,
            phone_number: new_user.phone_number,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            user_role: UserRole::Farmer,
            cooperative_id: new_user.cooperative_id,
            password_hash: Some(new_user.password_hash),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_first_name(&mut self, name: PersonName) {
        self.first_name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_last_name(&mut self, name: PersonName) {
        self.last_name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_phone_number(&mut self, phone: PhoneNumber) {
        self.phone_number = phone;
        self.updated_at = Utc::now();
    }

    pub fn set_password_hash(&mut self, hash: UserPassword) {
        self.password_hash = Some(hash);
        self.updated_at = Utc::now();
    }

    pub fn belongs_to(&self, cooperative_id: CooperativeId) -> bool {
        self.cooperative_id == Some(cooperative_id)
    }
}

impl HasRole for User {
    fn role(&self) -> UserRole {
        self.user_role
    }
}
