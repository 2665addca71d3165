//! Error handling utilities for repositories

use readalong_core::error::DomainError;
use readalong_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for a foreign key violation and return the given error, or fall back
pub fn map_foreign_key_violation<F>(e: SqlxError, on_violation: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_violation();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

pub fn comment_not_found(id: Snowflake) -> DomainError {
    DomainError::CommentNotFound(id)
}
