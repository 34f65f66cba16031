//! Entity Module

pub mod cooperative;
pub mod user;
pub mod user_profile;
