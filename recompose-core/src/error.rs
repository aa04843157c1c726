//! Error types for recompose.
//!
//! All errors use `thiserror` for ergonomic error handling and proper error chains.

use thiserror::Error;

/// Result type alias for recompose operations.
pub type Result<T> = std::result::Result<T, RecomposeError>;

/// Main error type for recompose.
#[derive(Error, Debug)]
pub enum RecomposeError {
    /// A service record lacks a field the document schema cannot default.
    /// Fatal for the whole document: emitting a placeholder would fabricate
    /// deployment state that was never observed.
    #[error("service {service} in stack {stack} is missing required field '{field}'")]
    MissingRequiredField { stack: String, service: String, field: &'static str },

    #[error("invalid stack selector {pattern:?}: {reason}")]
    InvalidSelector { pattern: String, reason: String },
}
