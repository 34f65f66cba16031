//! Register Use Case
//!
//! Creates a farmer account and issues its first access token.

use std::sync::Arc;

use kernel::id::CooperativeId;
use platform::token::TokenService;

use crate::application::config::AuthConfig;
use crate::application::credentials::hash_password;
use crate::domain::entity::{
    user::{NewUser, User},
    user_profile::UserProfile,
};
use crate::domain::repository::{CooperativeRepository, UserRepository};
use crate::domain::value_object::{
    access_claims::AccessClaims, email::Email, person_name::PersonName,
    phone_number::PhoneNumber, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Register input (required fields already checked for presence)
pub struct RegisterInput {
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    /// Blank counts as no cooperative
    pub cooperative_id: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

pub struct RegisterOutput {
    pub profile: UserProfile,
    pub token: String,
}

pub struct RegisterUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: TokenService,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: TokenService) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        if input.password != input.confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }

        let raw_password = RawPassword::new(input.password)?;
        let email = Email::new(&input.email)?;
        let phone_number = PhoneNumber::new(&input.phone_number)?;
        let first_name = PersonName::new(&input.first_name, "First name")?;
        let last_name = PersonName::new(&input.last_name, "Last name")?;
        let cooperative_id = parse_cooperative_id(input.cooperative_id.as_deref())?;

        if self
            .repo
            .exists_by_email_or_phone(&email, &phone_number)
            .await?
        {
            return Err(AuthError::DuplicateUser);
        }

        let cooperative = match cooperative_id {
            Some(id) => Some(
                self.repo
                    .find_cooperative(&id)
                    .await?
                    .ok_or_else(|| AuthError::Validation("Cooperative does not exist".to_string()))?,
            ),
            None => None,
        };

        let password_hash = hash_password(raw_password, self.config.bcrypt_cost).await?;

        let user = User::register(NewUser {
            email,
            phone_number,
            first_name,
            last_name,
            cooperative_id,
            password_hash,
        });

        // A concurrent registration can still hit the unique indexes here
        self.repo.create(&user).await?;

        let token = self.tokens.issue(AccessClaims::for_user(&user))?;

        tracing::info!(
            user_id = %user.user_id,
            cooperative_id = ?user.cooperative_id.map(|id| id.to_string()),
            "User registered"
        );

        Ok(RegisterOutput {
            profile: UserProfile { user, cooperative },
            token,
        })
    }
}

fn parse_cooperative_id(raw: Option<&str>) -> AuthResult<Option<CooperativeId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse::<CooperativeId>()
            .map(Some)
            .map_err(|_| AuthError::Validation("Invalid cooperative id".to_string())),
        None => Ok(None),
    }
}
