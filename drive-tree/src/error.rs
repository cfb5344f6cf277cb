//! Error types for tree operations
//!
//! This module defines the failures a tree mutation or lookup can produce,
//! plus the persistence errors raised by [`TreeStore`](crate::store::TreeStore)
//! implementations.

use drive_acl::{AclError, GrantId};
use drive_naming::NamingError;
use thiserror::Error;

use crate::node::NodeId;

/// Tree error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The candidate name failed one or more required naming rules
    #[error("Invalid name '{name}': violates {}", violations.join(", "))]
    InvalidName {
        /// The rejected name
        name: String,
        /// Every violated required rule id
        violations: Vec<String>,
    },

    /// No node with this id exists
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// No grant with this id exists on the node
    #[error("Grant not found: {0}")]
    GrantNotFound(GrantId),

    /// Structurally illegal mutation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Naming policy could not be built
    #[error("Naming policy error: {0}")]
    Policy(String),

    /// A loaded tree breaks an invariant
    #[error("Corrupt tree: {0}")]
    Corrupt(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

impl From<NamingError> for TreeError {
    fn from(err: NamingError) -> Self {
        match err {
            NamingError::Rejected { name, violations } => TreeError::InvalidName { name, violations },
            other => TreeError::Policy(other.to_string()),
        }
    }
}

impl From<AclError> for TreeError {
    fn from(err: AclError) -> Self {
        match err {
            AclError::GrantNotFound(id) => TreeError::GrantNotFound(id),
            AclError::InvalidOperation(msg) => TreeError::InvalidOperation(msg),
            AclError::Corrupt(msg) => TreeError::Corrupt(msg),
        }
    }
}

/// Persistence error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing storage failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored form could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another writer saved a newer revision first
    #[error("Revision conflict: expected {expected:?}, found {found:?}")]
    Conflict {
        /// Revision the writer based its change on
        expected: Option<u64>,
        /// Revision currently stored
        found: Option<u64>,
    },
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;
