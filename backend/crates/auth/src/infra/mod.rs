//! Infrastructure Layer
//!
//! Store implementations: PostgreSQL for deployments, in-memory for tests
//! and local runs without a database.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAuthRepository;
pub use postgres::PgAuthRepository;
