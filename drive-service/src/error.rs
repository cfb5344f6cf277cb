//! Error types for drive service operations
//!
//! This module defines every failure the service facade can report to the UI
//! layer. Expected policy and structure violations are ordinary results; only
//! storage and configuration faults count as server errors.

use drive_acl::AclError;
use drive_naming::NamingError;
use drive_tree::{StoreError, TreeError};
use thiserror::Error;

/// Drive service error types.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Name fails one or more required naming rules
    #[error("Invalid name '{name}': violates {}", violations.join(", "))]
    InvalidName {
        /// The rejected name
        name: String,
        /// Every violated required rule id
        violations: Vec<String>,
    },

    /// Referenced folder or grant does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Structurally illegal mutation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Concurrent modification detected while saving
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persisted state could not be loaded or saved
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for drive service operations.
pub type DriveResult<T> = Result<T, DriveError>;

impl DriveError {
    /// Check if this error should be logged at error level.
    ///
    /// Validation and structural failures are expected and are not.
    pub fn is_server_error(&self) -> bool {
        matches!(self, DriveError::Storage(_) | DriveError::Config(_))
    }

    /// Check if repeating the call could succeed.
    ///
    /// Only conflicts are transient: the service has already reloaded the
    /// stored tree when it reports one. Validation failures never are.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DriveError::Conflict(_))
    }

    /// Violated rule ids for `InvalidName`, empty otherwise.
    pub fn violations(&self) -> &[String] {
        match self {
            DriveError::InvalidName { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DriveError::InvalidName { .. } => 422,
            DriveError::NotFound(_) => 404,
            DriveError::InvalidOperation(_) => 400,
            DriveError::Conflict(_) => 409,
            DriveError::Storage(_) | DriveError::Config(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            DriveError::InvalidName { .. } => "INVALID_NAME",
            DriveError::NotFound(_) => "NOT_FOUND",
            DriveError::InvalidOperation(_) => "INVALID_OPERATION",
            DriveError::Conflict(_) => "CONFLICT",
            DriveError::Storage(_) => "STORAGE_ERROR",
            DriveError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<TreeError> for DriveError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::InvalidName { name, violations } => DriveError::InvalidName { name, violations },
            TreeError::NodeNotFound(id) => DriveError::NotFound(format!("folder {}", id)),
            TreeError::GrantNotFound(id) => DriveError::NotFound(format!("permission {}", id)),
            TreeError::InvalidOperation(msg) => DriveError::InvalidOperation(msg),
            TreeError::Policy(msg) => DriveError::Config(msg),
            TreeError::Corrupt(msg) => DriveError::Storage(format!("corrupt tree: {}", msg)),
        }
    }
}

impl From<AclError> for DriveError {
    fn from(err: AclError) -> Self {
        TreeError::from(err).into()
    }
}

impl From<NamingError> for DriveError {
    fn from(err: NamingError) -> Self {
        TreeError::from(err).into()
    }
}

impl From<StoreError> for DriveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { expected, found } => DriveError::Conflict(format!(
                "tree was saved by another writer (expected revision {:?}, found {:?})",
                expected, found
            )),
            other => DriveError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_tree::NodeId;

    #[test]
    fn test_tree_errors_map_to_taxonomy() {
        let err: DriveError = TreeError::NodeNotFound(NodeId::new()).into();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.status_code(), 404);

        let err: DriveError = TreeError::InvalidName {
            name: "bad:name".to_string(),
            violations: vec!["reserved-characters".to_string()],
        }
        .into();
        assert_eq!(err.violations(), &["reserved-characters".to_string()]);
        assert!(!err.is_server_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_store_conflict_is_retryable() {
        let err: DriveError = StoreError::Conflict {
            expected: Some(1),
            found: Some(2),
        }
        .into();
        assert!(matches!(err, DriveError::Conflict(_)));
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_storage_errors_are_server_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DriveError = StoreError::Io(io).into();
        assert!(err.is_server_error());
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
