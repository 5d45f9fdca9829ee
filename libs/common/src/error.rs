//! Error types for database access
//!
//! Store collaborators surface their failures through [`DatabaseError`] so
//! callers can distinguish an unreachable database (mapped to 503 at the
//! HTTP boundary) from a failed query (mapped to the generic 500 path).

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Failure modes of the persistence layer
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The database could not be reached or a connection could not be acquired
    #[error("database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A query failed after a connection was established
    #[error("database query error: {0}")]
    Query(#[source] SqlxError),

    /// The database configuration was invalid or incomplete
    #[error("database configuration error: {0}")]
    Configuration(String),
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                DatabaseError::Connection(err)
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
