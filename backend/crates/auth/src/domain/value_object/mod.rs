//! Value Object Module

pub mod access_claims;
pub mod email;
pub mod person_name;
pub mod phone_number;
pub mod user_password;
