//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_bearer_token;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation.
/// Mounted under `/api/auth`.
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AuthStore,
{
    let state = AuthAppState::new(repo, config);

    let protected = Router::new()
        .route(
            "/me",
            get(handlers::me::<R>).patch(handlers::update_me::<R>),
        )
        .route(
            "/cooperatives/{cooperative_id}/members",
            get(handlers::cooperative_members::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token::<R>,
        ));

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/register", post(handlers::register::<R>))
        .merge(protected)
        .with_state(state)
}

/// Store health probe. Mounted under `/api`.
pub fn health_router<R>(repo: R) -> Router
where
    R: AuthStore,
{
    Router::new()
        .route("/health", get(handlers::health::<R>))
        .with_state(Arc::new(repo))
}
