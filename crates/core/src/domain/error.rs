// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid ticket status transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown ticket status: {0}")]
    UnknownStatus(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
