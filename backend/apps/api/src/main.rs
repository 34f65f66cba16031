//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::{AuthConfig, PgAuthRepository, auth_router, health_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3001,http://127.0.0.1:3001";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Auth configuration
    let auth_config = AuthConfig::from_env().context("Invalid auth configuration")?;
    if auth_config.token.uses_insecure_default() {
        tracing::warn!("JWT_SECRET is not set; tokens are signed with the insecure default secret");
    }
    tracing::info!(
        token_ttl = ?auth_config.token.expires_in,
        bcrypt_cost = auth_config.bcrypt_cost,
        "Auth configuration loaded"
    );

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
    let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw:?}"))?,
        Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(max_connections, "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations completed");

    let repo = PgAuthRepository::new(pool);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(repo.clone(), auth_config))
        .nest("/api", health_router(repo))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be a socket address such as 0.0.0.0:3000")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the browser client. Origins come from `FRONTEND_ORIGINS`
/// (comma-separated).
fn cors_layer() -> CorsLayer {
    let frontend_origins =
        env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
