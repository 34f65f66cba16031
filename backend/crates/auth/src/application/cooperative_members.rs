//! Cooperative Members Use Case
//!
//! Lists the users affiliated with a cooperative. Admins may list any
//! cooperative, cooperative staff only their own.

use std::sync::Arc;

use kernel::id::CooperativeId;
use kernel::role::{is_admin, is_cooperative_staff};

use crate::domain::entity::{cooperative::Cooperative, user::User};
use crate::domain::repository::{CooperativeRepository, UserRepository};
use crate::domain::value_object::access_claims::AccessClaims;
use crate::error::{AuthError, AuthResult};

pub struct CooperativeMembersOutput {
    pub cooperative: Cooperative,
    pub members: Vec<User>,
}

pub struct CooperativeMembersUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    repo: Arc<R>,
}

impl<R> CooperativeMembersUseCase<R>
where
    R: UserRepository + CooperativeRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        claims: &AccessClaims,
        cooperative_id: CooperativeId,
    ) -> AuthResult<CooperativeMembersOutput> {
        if !can_view_members(claims, cooperative_id) {
            tracing::warn!(
                user_id = %claims.user_id,
                role = %claims.role,
                cooperative_id = %cooperative_id,
                "Member listing denied"
            );
            return Err(AuthError::Forbidden);
        }

        let cooperative = self
            .repo
            .find_cooperative(&cooperative_id)
            .await?
            .ok_or(AuthError::CooperativeNotFound)?;

        let members = self.repo.list_by_cooperative(&cooperative_id).await?;

        Ok(CooperativeMembersOutput {
            cooperative,
            members,
        })
    }
}

fn can_view_members(claims: &AccessClaims, cooperative_id: CooperativeId) -> bool {
    is_admin(claims)
        || (is_cooperative_staff(claims) && claims.cooperative_id == Some(cooperative_id))
}
