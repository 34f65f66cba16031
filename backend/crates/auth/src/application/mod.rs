//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod cooperative_members;
pub mod credentials;
pub mod current_user;
pub mod login;
pub mod profile;
pub mod register;
pub mod update_profile;

// Re-exports
pub use config::{AuthConfig, ConfigError};
pub use cooperative_members::{CooperativeMembersOutput, CooperativeMembersUseCase};
pub use credentials::TimingGuard;
pub use current_user::CurrentUserUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
