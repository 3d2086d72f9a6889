//! Error types for Quill

use thiserror::Error;

/// The main error type for Quill operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The escape hook dropped every column of a clause
    #[error("{clause} clause has no columns left after escaping")]
    EmptyClause { clause: &'static str },

    /// Invalid query configuration
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },
}

/// Convenience Result type for Quill operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new empty clause error
    pub fn empty_clause(clause: &'static str) -> Self {
        Self::EmptyClause { clause }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }
}
