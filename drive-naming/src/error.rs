//! Error types for naming policy operations

use thiserror::Error;

/// Naming policy error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NamingError {
    /// The candidate name failed one or more required rules.
    #[error("Invalid name '{name}': violates {}", violations.join(", "))]
    Rejected {
        /// The rejected candidate name
        name: String,
        /// Ids of every violated required rule, in evaluation order
        violations: Vec<String>,
    },

    /// A rule pattern is not a valid regular expression.
    #[error("Invalid pattern for rule {rule_id}: {message}")]
    InvalidPattern {
        /// Id of the offending rule
        rule_id: String,
        /// Regex compiler message
        message: String,
    },

    /// Two rules share the same id.
    #[error("Duplicate naming rule id: {0}")]
    DuplicateRule(String),
}

/// Result type for naming policy operations.
pub type NamingResult<T> = Result<T, NamingError>;

impl NamingError {
    /// Violated rule ids for a rejection, empty for construction errors.
    pub fn violations(&self) -> &[String] {
        match self {
            NamingError::Rejected { violations, .. } => violations,
            _ => &[],
        }
    }
}
