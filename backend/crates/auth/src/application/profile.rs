//! Profile assembly

use crate::domain::entity::{user::User, user_profile::UserProfile};
use crate::domain::repository::CooperativeRepository;
use crate::error::AuthResult;

/// Attach the user's cooperative, if any. A dangling affiliation is
/// logged and returned without a cooperative.
pub async fn load_profile<C>(repo: &C, user: User) -> AuthResult<UserProfile>
where
    C: CooperativeRepository,
{
    let cooperative = match user.cooperative_id {
        Some(cooperative_id) => {
            let found = repo.find_cooperative(&cooperative_id).await?;
            if found.is_none() {
                tracing::warn!(
                    user_id = %user.user_id,
                    cooperative_id = %cooperative_id,
                    "User references a missing cooperative"
                );
            }
            found
        }
        None => None,
    };

    Ok(UserProfile { user, cooperative })
}
