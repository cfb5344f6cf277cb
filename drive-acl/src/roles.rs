//! Role hierarchy
//!
//! This module defines the ordered scale of roles a principal can hold on a
//! drive resource, along with the capabilities each role carries.

use serde::{Deserialize, Serialize};

/// Role held by a principal on a resource.
///
/// Roles are hierarchical, with each role carrying the capabilities of lower roles.
/// The hierarchy is: Reader < Commenter < Writer < FileOrganizer < Organizer < Owner
///
/// # Permission Model
///
/// - **Reader**: Can view the resource and its contents
/// - **Commenter**: Can view and comment
/// - **Writer**: Can create and edit content
/// - **FileOrganizer**: Can move and rename items inside the resource
/// - **Organizer**: Can manage sharing and membership
/// - **Owner**: Full control, at most one per resource
///
/// # Examples
///
/// ```
/// use drive_acl::Role;
///
/// let role = Role::Writer;
/// assert!(role.can_edit());
/// assert!(!role.can_organize());
///
/// assert!(Role::Owner > Role::Organizer);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Read-only access
    Reader = 0,

    /// Read and comment
    Commenter = 1,

    /// Create and edit content
    Writer = 2,

    /// Move and rename items
    FileOrganizer = 3,

    /// Manage sharing and membership
    Organizer = 4,

    /// Full control
    Owner = 5,
}

impl Role {
    /// Check if this role can comment.
    pub fn can_comment(&self) -> bool {
        *self >= Role::Commenter
    }

    /// Check if this role can edit content.
    ///
    /// # Returns
    ///
    /// `true` for Writer and above
    pub fn can_edit(&self) -> bool {
        *self >= Role::Writer
    }

    /// Check if this role can move and rename items.
    ///
    /// # Returns
    ///
    /// `true` for FileOrganizer and above
    pub fn can_organize(&self) -> bool {
        *self >= Role::FileOrganizer
    }

    /// Check if this role can add, change, or remove grants.
    ///
    /// # Returns
    ///
    /// `true` for Organizer and Owner
    pub fn can_manage_sharing(&self) -> bool {
        *self >= Role::Organizer
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive; `file_organizer` and
    ///   `fileorganizer` are both accepted)
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use drive_acl::Role;
    ///
    /// assert_eq!(Role::parse("writer"), Some(Role::Writer));
    /// assert_eq!(Role::parse("fileOrganizer"), Some(Role::FileOrganizer));
    /// assert_eq!(Role::parse("editor"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "reader" => Some(Self::Reader),
            "commenter" => Some(Self::Commenter),
            "writer" => Some(Self::Writer),
            "fileorganizer" => Some(Self::FileOrganizer),
            "organizer" => Some(Self::Organizer),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get string representation of the role.
    ///
    /// # Examples
    ///
    /// ```
    /// use drive_acl::Role;
    ///
    /// assert_eq!(Role::FileOrganizer.as_str(), "fileOrganizer");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reader => "reader",
            Self::Commenter => "commenter",
            Self::Writer => "writer",
            Self::FileOrganizer => "fileOrganizer",
            Self::Organizer => "organizer",
            Self::Owner => "owner",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Reader => "Reader",
            Self::Commenter => "Commenter",
            Self::Writer => "Writer",
            Self::FileOrganizer => "File Organizer",
            Self::Organizer => "Organizer",
            Self::Owner => "Owner",
        }
    }

    /// Get all roles, lowest first.
    pub fn all() -> [Self; 6] {
        [
            Self::Reader,
            Self::Commenter,
            Self::Writer,
            Self::FileOrganizer,
            Self::Organizer,
            Self::Owner,
        ]
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Reader
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
