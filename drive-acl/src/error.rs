//! Error types for access-control operations

use thiserror::Error;

use crate::grant::GrantId;

/// Access-control error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AclError {
    /// No grant with this id exists on the resource.
    #[error("Grant not found: {0}")]
    GrantNotFound(GrantId),

    /// The change would leave the list in an invalid state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A deserialized list breaks an invariant.
    #[error("Corrupt access-control list: {0}")]
    Corrupt(String),
}

/// Result type for access-control operations.
pub type AclResult<T> = Result<T, AclError>;
