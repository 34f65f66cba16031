//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, bearer middleware, router
//!
//! ## Features
//! - Registration (email, phone, name, optional cooperative) as FARMER
//! - Email + password login issuing an HS256 bearer token
//! - Current user lookup and profile update
//! - Cooperative member listing for admins and cooperative staff
//!
//! ## Security Model
//! - Passwords hashed with bcrypt (cost 12 by default)
//! - Unknown email, missing digest and wrong password are indistinguishable,
//!   including in timing
//! - Role checks read the role from verified claims, never from the request

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use domain::value_object::access_claims::AccessClaims;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::router::{auth_router, auth_router_generic, health_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
