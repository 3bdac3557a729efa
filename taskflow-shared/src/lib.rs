//! # TaskFlow Shared Library
//!
//! Domain types and business logic behind the TaskFlow API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects and tasks, with their SQL queries
//! - `store`: Storage trait with PostgreSQL and in-memory implementations
//! - `auth`: Passwords, JWTs, identity resolution and ownership checks
//! - `pagination`: Page/size clamping and sort validation
//! - `services`: Validated operations on accounts, projects and tasks
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;
pub mod services;
pub mod store;

/// Current version of the TaskFlow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
