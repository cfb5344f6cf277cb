//! # Folder Templates
//!
//! Predefined folder layouts that can be stamped under any folder in one step.

use serde::{Deserialize, Serialize};

/// A predefined set of child folders.
///
/// # Examples
///
/// ```
/// use drive_tree::FolderTemplate;
///
/// let template = FolderTemplate::parse("project").unwrap();
/// assert_eq!(template.folders().len(), 5);
/// assert_eq!(template.folders()[0], "01_Documentation");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FolderTemplate {
    /// Numbered project lifecycle phases
    Project,

    /// Shared team workspace
    Team,

    /// Client engagement
    Client,
}

impl FolderTemplate {
    /// The folders this template creates, in creation order.
    pub fn folders(&self) -> &'static [&'static str] {
        match self {
            Self::Project => &[
                "01_Documentation",
                "02_Design",
                "03_Development",
                "04_Testing",
                "05_Deployment",
            ],
            Self::Team => &[
                "Shared_Resources",
                "Templates",
                "Temporary_Files",
                "Important_Documents",
            ],
            Self::Client => &["Contracts", "Billing", "Communications", "Deliverables"],
        }
    }

    /// Get a human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Project => "Project Structure",
            Self::Team => "Team Structure",
            Self::Client => "Client Structure",
        }
    }

    /// Parse from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "project" => Some(Self::Project),
            "team" => Some(Self::Team),
            "client" => Some(Self::Client),
            _ => None,
        }
    }

    /// Get all templates.
    pub fn all() -> [Self; 3] {
        [Self::Project, Self::Team, Self::Client]
    }
}
