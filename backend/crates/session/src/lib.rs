//! Client-side session
//!
//! Keeps the signed-in user for an application talking to the auth API:
//! - `state` - session states and the cached user
//! - `store` - token persistence under a fixed key
//! - `gateway` - HTTP calls to `/api/auth/*` and other API routes
//! - `context` - the session state machine tying them together

pub mod context;
pub mod error;
pub mod gateway;
pub mod state;
pub mod store;

pub use context::SessionContext;
pub use error::{GatewayError, SessionError, StoreError};
pub use gateway::{
    AuthGateway, AuthPayload, HttpAuthGateway, LoginRequest, Method, RegisterRequest,
};
pub use state::{ProfilePatch, SessionCooperative, SessionState, SessionUser};
pub use store::{AUTH_TOKEN_KEY, FileTokenStore, MemoryTokenStore, TokenStore};
