//! Session states and the cached user

use chrono::{DateTime, Utc};
use kernel::id::{CooperativeId, UserId};
use kernel::role::{HasRole, UserRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCooperative {
    pub id: CooperativeId,
    pub name: String,
    pub location: String,
}

/// The user as returned by the auth API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub cooperative_id: Option<CooperativeId>,
    #[serde(default)]
    pub cooperative: Option<SessionCooperative>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Overwrite the fields present in `patch`
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(cooperative) = patch.cooperative {
            self.cooperative_id = cooperative.as_ref().map(|c| c.id);
            self.cooperative = cooperative;
        }
    }
}

impl HasRole for SessionUser {
    fn role(&self) -> UserRole {
        self.role
    }
}

/// Partial profile merged client-side. The role is not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some(None)` clears the affiliation
    pub cooperative: Option<Option<SessionCooperative>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    /// A persisted token is being checked against the server
    Validating,
    Authenticated(SessionUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Validating)
    }
}
