//! HTTP Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use kernel::response::ApiResponse;
use platform::token::TokenService;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CooperativeMembersUseCase, CurrentUserUseCase, LoginUseCase, RegisterUseCase, TimingGuard,
    UpdateProfileUseCase,
};
use crate::domain::repository::{AuthStore, HealthCheck};
use crate::domain::value_object::access_claims::AccessClaims;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, HealthResponse, LoginRequest, MembersResponse, RegisterRequest,
    UpdateProfileRequest, UserResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthStore,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: TokenService,
    pub timing_guard: TimingGuard,
}

impl<R> AuthAppState<R>
where
    R: AuthStore,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let tokens = TokenService::new(config.token.clone());
        let timing_guard = TimingGuard::new(config.bcrypt_cost);

        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            tokens,
            timing_guard,
        }
    }
}

/// Unwrap a JSON body; any rejection is a 400 with a fixed message
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        AuthError::Validation("Invalid request body".to_string())
    })
}

// ============================================================================
// Login / Register
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<AuthResponse>>
where
    R: AuthStore,
{
    let input = json_body(payload)?.into_input().ok_or_else(|| {
        AuthError::Validation("Email and password are required".to_string())
    })?;

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
        state.timing_guard.clone(),
    );
    let output = use_case.execute(input).await?;

    Ok(ApiResponse::ok(AuthResponse {
        user: output.profile.into(),
        token: output.token,
    })
    .with_message("Login successful"))
}

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<AuthResponse>>
where
    R: AuthStore,
{
    let input = json_body(payload)?
        .into_input()
        .ok_or_else(|| AuthError::Validation("All fields are required".to_string()))?;

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );
    let output = use_case.execute(input).await?;

    Ok(ApiResponse::ok(AuthResponse {
        user: output.profile.into(),
        token: output.token,
    })
    .with_message("Registration successful"))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(claims): Extension<AccessClaims>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: AuthStore,
{
    let profile = CurrentUserUseCase::new(state.repo.clone())
        .execute(&claims)
        .await?;

    Ok(ApiResponse::ok(profile.into()))
}

/// PATCH /api/auth/me
pub async fn update_me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(claims): Extension<AccessClaims>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: AuthStore,
{
    let input = json_body(payload)?.into();

    let profile = UpdateProfileUseCase::new(state.repo.clone())
        .execute(&claims, input)
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(profile)).with_message("Profile updated"))
}

// ============================================================================
// Cooperative Members
// ============================================================================

/// GET /api/auth/cooperatives/{cooperative_id}/members
pub async fn cooperative_members<R>(
    State(state): State<AuthAppState<R>>,
    Extension(claims): Extension<AccessClaims>,
    Path(cooperative_id): Path<String>,
) -> AuthResult<ApiResponse<MembersResponse>>
where
    R: AuthStore,
{
    let cooperative_id = cooperative_id
        .parse()
        .map_err(|_| AuthError::Validation("Invalid cooperative id".to_string()))?;

    let output = CooperativeMembersUseCase::new(state.repo.clone())
        .execute(&claims, cooperative_id)
        .await?;

    Ok(ApiResponse::ok(MembersResponse::new(
        output.cooperative,
        output.members,
    )))
}

// ============================================================================
// Health
// ============================================================================

/// GET /api/health
pub async fn health<R>(State(repo): State<Arc<R>>) -> Response
where
    R: HealthCheck + Send + Sync + 'static,
{
    match repo.ping().await {
        Ok(()) => ApiResponse::ok(HealthResponse { database: "up" }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            let body = ApiResponse {
                success: false,
                data: Some(HealthResponse { database: "down" }),
                message: None,
                error: Some("Database unavailable".to_string()),
            };
            (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
        }
    }
}
