//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (bcrypt, fixed work factor)
//! - Signed access tokens (HS256 JWT)
//! - Bearer token transport over the `Authorization` header

pub mod bearer;
pub mod password;
pub mod token;
