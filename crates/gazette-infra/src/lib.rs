//! # Gazette Infrastructure
//!
//! Concrete implementations of the ports defined in `gazette-core`.
//! This crate contains the database repositories and the identity token
//! service.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//!
//! The in-memory repositories are always available and serve as the fallback
//! when no database is configured, and as the substrate for handler tests.

pub mod auth;
pub mod database;

pub use auth::JwtTokenService;
pub use database::{InMemoryGroupRepository, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository};
