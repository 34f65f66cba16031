//! Access Claims
//!
//! Identity carried in a signed access token. Serialized in camelCase:
//! `{userId, email, role, cooperativeId?}`; `iat`/`exp` are added by the
//! token service.

use kernel::id::{CooperativeId, UserId};
use kernel::role::{HasRole, UserRole};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooperative_id: Option<CooperativeId>,
}

impl AccessClaims {
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.as_str().to_string(),
            role: user.user_role,
            cooperative_id: user.cooperative_id,
        }
    }
}

impl HasRole for AccessClaims {
    fn role(&self) -> UserRole {
        self.role
    }
}
