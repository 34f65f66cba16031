//! User Profile
//!
//! A user together with their cooperative, the shape clients receive.

use crate::domain::entity::{cooperative::Cooperative, user::User};

#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub cooperative: Option<Cooperative>,
}
