// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    /// Malformed input rejected before it reaches the queue
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any failure of the ticket store (connection, query, write, commit)
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// True for failures raised by the store itself rather than by queue rules
    pub fn is_store_failure(&self) -> bool {
        matches!(self, AppError::Database(_))
    }
}
