//! # Blogicum Infrastructure
//!
//! Concrete implementations of the ports defined in `blogicum-core`:
//! PostgreSQL repositories, the in-memory store and the auth services.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL database support via SeaORM

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryBlogStore};
