//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use ticketline_core::domain::DomainError;
use ticketline_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

fn owned(code: i32, msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code, msg.into(), None::<()>)
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => owned(code::VALIDATION_ERROR, msg),
        AppError::NotFound(msg) => owned(code::NOT_FOUND, msg),
        AppError::Database(msg) => owned(code::DB_ERROR, msg),
        AppError::Domain(e @ DomainError::InvalidStateTransition { .. }) => {
            owned(code::CONFLICT, e.to_string())
        }
        AppError::Domain(e) => owned(code::VALIDATION_ERROR, e.to_string()),
        AppError::Config(msg) => owned(code::INTERNAL_ERROR, msg),
    }
}
