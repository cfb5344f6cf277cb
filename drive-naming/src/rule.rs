//! # Naming Rules
//!
//! A naming rule pairs a regular-expression pattern with a flag saying
//! whether it blocks acceptance or only documents a convention.

use serde::{Deserialize, Serialize};

/// A single naming convention.
///
/// Rules are plain data so they can be loaded from configuration; they are
/// compiled into matchers when a [`NamingPolicy`](crate::NamingPolicy) is built.
///
/// # Example
///
/// ```
/// use drive_naming::NamingRule;
///
/// let rule = NamingRule::required("no-spaces", "No spaces", r"^\S+$")
///     .with_description("Use underscores instead of spaces")
///     .with_example("Project_Report");
/// assert!(rule.required);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamingRule {
    /// Stable rule identifier, reported in violations and warnings.
    pub id: String,

    /// Human-readable rule name.
    pub name: String,

    /// Regular expression a conforming name matches.
    pub pattern: String,

    /// What the convention asks for.
    #[serde(default)]
    pub description: String,

    /// Whether failing this rule rejects the name.
    pub required: bool,

    /// A conforming example name.
    #[serde(default)]
    pub example: String,
}

impl NamingRule {
    /// Create a required (blocking) rule.
    pub fn required(id: impl Into<String>, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(id, name, pattern, true)
    }

    /// Create an advisory rule whose failures are only warnings.
    pub fn advisory(id: impl Into<String>, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(id, name, pattern, false)
    }

    fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pattern: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pattern: pattern.into(),
            description: String::new(),
            required,
            example: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the example name.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }
}
