//! User roles and the authorization predicate set
//!
//! The policy lives in data: each predicate is a membership test against a
//! role set, so widening a check means editing one constant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Farmer,
    CooperativeStaff,
    Admin,
    Veterinarian,
}

/// Roles allowed to act on behalf of a cooperative.
pub const STAFF_ROLES: &[UserRole] = &[UserRole::CooperativeStaff, UserRole::Admin];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Farmer,
        UserRole::CooperativeStaff,
        UserRole::Admin,
        UserRole::Veterinarian,
    ];

    /// Wire and storage code
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Farmer => "FARMER",
            CooperativeStaff => "COOPERATIVE_STAFF",
            Admin => "ADMIN",
            Veterinarian => "VETERINARIAN",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, UnknownRole> {
        Self::ALL
            .into_iter()
            .find(|role| role.code() == code)
            .ok_or_else(|| UnknownRole(code.to_string()))
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Anything that carries an authoritative role: a stored user, verified
/// token claims, the client's session user.
pub trait HasRole {
    fn role(&self) -> UserRole;
}

impl HasRole for UserRole {
    fn role(&self) -> UserRole {
        *self
    }
}

pub fn has_role(subject: &impl HasRole, role: UserRole) -> bool {
    subject.role() == role
}

pub fn has_any_role(subject: &impl HasRole, roles: &[UserRole]) -> bool {
    roles.contains(&subject.role())
}

pub fn is_admin(subject: &impl HasRole) -> bool {
    has_role(subject, UserRole::Admin)
}

/// COOPERATIVE_STAFF or ADMIN
pub fn is_cooperative_staff(subject: &impl HasRole) -> bool {
    has_any_role(subject, STAFF_ROLES)
}

pub fn is_farmer(subject: &impl HasRole) -> bool {
    has_role(subject, UserRole::Farmer)
}
