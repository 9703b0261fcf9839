//! Repository Module
//!
//! Function-based CRUD over the SQLite pool. Handlers convert dates to
//! Unix-millis ranges; repositories only see `i64` bounds and `YYYY-MM-DD`
//! day strings.

pub mod cash_cut;
pub mod daily_data;
pub mod expense;
pub mod user;

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
