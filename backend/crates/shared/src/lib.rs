//! Shared Kernel - Vocabulary shared by the server and the client
//!
//! This crate holds the small core every other crate agrees on:
//! - The error taxonomy and the `{success, data, message, error}` envelope
//! - Typed ID wrappers
//! - User roles and the authorization predicate set
//!
//! It has no knowledge of HTTP routing or storage; those integrations are
//! feature-gated (`axum`, `sqlx`).

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
pub mod role;
