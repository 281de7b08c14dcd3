//! Repository Module
//!
//! CRUD access to the configuration entities (zones, tables, dishes) and
//! read-only reservation queries. Repositories are plain free functions over
//! `&SqlitePool`; the transactional reservation/stock writes live in the
//! [`crate::reservations`] and [`crate::stock`] engines, not here.

pub mod dining_table;
pub mod dish;
pub mod reservation;
pub mod zone;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
