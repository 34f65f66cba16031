//! Auth Middleware
//!
//! Bearer-token gate for protected routes. On success the verified
//! [`AccessClaims`] are placed in the request extensions.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::bearer_from_headers;

use crate::domain::repository::AuthStore;
use crate::domain::value_object::access_claims::AccessClaims;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Middleware that requires a valid bearer token
pub async fn require_bearer_token<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AuthStore,
{
    let token = bearer_from_headers(req.headers()).ok_or(AuthError::Unauthenticated)?;
    let signed = state.tokens.verify::<AccessClaims>(&token)?;

    req.extensions_mut().insert(signed.claims);

    Ok(next.run(req).await)
}
