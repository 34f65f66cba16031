//! API DTOs (Data Transfer Objects)
//!
//! Request fields are optional at the serde level so that a missing field
//! is reported with the same message as an empty one.

use chrono::{DateTime, Utc};
use kernel::id::{CooperativeId, UserId};
use kernel::role::UserRole;
use serde::{Deserialize, Serialize};

use crate::application::{LoginInput, RegisterInput, UpdateProfileInput};
use crate::domain::entity::{cooperative::Cooperative, user::User, user_profile::UserProfile};

/// `Some` only for a non-empty value
fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// `None` when either field is missing or empty
    pub fn into_input(self) -> Option<LoginInput> {
        Some(LoginInput {
            email: present(self.email)?,
            password: present(self.password)?,
        })
    }
}

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub cooperative_id: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl RegisterRequest {
    /// `None` when any required field is missing or empty
    pub fn into_input(self) -> Option<RegisterInput> {
        Some(RegisterInput {
            email: present(self.email)?,
            phone_number: present(self.phone_number)?,
            first_name: present(self.first_name)?,
            last_name: present(self.last_name)?,
            cooperative_id: self.cooperative_id,
            password: present(self.password)?,
            confirm_password: present(self.confirm_password)?,
        })
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileInput {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CooperativeResponse {
    pub id: CooperativeId,
    pub name: String,
    pub location: String,
}

impl From<Cooperative> for CooperativeResponse {
    fn from(c: Cooperative) -> Self {
        Self {
            id: c.cooperative_id,
            name: c.name,
            location: c.location,
        }
    }
}

/// User as clients see it. Never carries the password digest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub cooperative_id: Option<CooperativeId>,
    pub cooperative: Option<CooperativeResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    fn build(user: User, cooperative: Option<Cooperative>) -> Self {
        Self {
            id: user.user_id,
            email: user.email.into_db(),
            phone_number: user.phone_number.into_db(),
            first_name: user.first_name.into_db(),
            last_name: user.last_name.into_db(),
            role: user.user_role,
            cooperative_id: user.cooperative_id,
            cooperative: cooperative.map(CooperativeResponse::from),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self::build(profile.user, profile.cooperative)
    }
}

/// Login and registration payload
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MembersResponse {
    pub cooperative: CooperativeResponse,
    pub members: Vec<UserResponse>,
}

impl MembersResponse {
    pub fn new(cooperative: Cooperative, members: Vec<User>) -> Self {
        let members = members
            .into_iter()
            .map(|user| UserResponse::build(user, Some(cooperative.clone())))
            .collect();

        Self {
            cooperative: cooperative.into(),
            members,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `"up"` or `"down"`
    pub database: &'static str,
}
