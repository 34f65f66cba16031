//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{cooperative::Cooperative, user::User, user_profile::UserProfile};
pub use repository::{AuthStore, CooperativeRepository, HealthCheck, UserRepository};
