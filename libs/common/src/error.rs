//! Custom error types for the common library
//!
//! This module defines the persistence error taxonomy shared by every
//! repository implementation in the workspace.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while creating the schema
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A unique constraint rejected the write
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// A stored document could not be encoded or decoded
    #[error("Document serialization error: {0}")]
    Serialization(String),
}

impl DatabaseError {
    /// Classify a query failure, turning unique-constraint violations into
    /// [`DatabaseError::Duplicate`].
    pub fn from_query(err: SqlxError, what: &str) -> Self {
        let unique = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());

        if unique {
            DatabaseError::Duplicate(what.to_string())
        } else {
            DatabaseError::Query(err)
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_stay_query_errors() {
        let err = DatabaseError::from_query(SqlxError::RowNotFound, "ingredient name");
        assert!(matches!(err, DatabaseError::Query(_)));
    }

    #[test]
    fn test_duplicate_message() {
        let err = DatabaseError::Duplicate("username".to_string());
        assert_eq!(err.to_string(), "Duplicate value: username");
    }
}
