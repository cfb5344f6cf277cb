//! Nested structure views for tree widgets.

use drive_acl::{Grant, Visibility};
use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// A folder and all of its descendants, nested.
///
/// Built by [`ResourceTree::structure`](crate::ResourceTree::structure). Paths
/// are computed at build time and reflect the tree as it was then.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderStructure {
    /// Folder ID
    pub id: NodeId,

    /// Display name
    pub name: String,

    /// Slash-joined path from the root
    pub path: String,

    /// Visibility of the folder's own list
    pub visibility: Visibility,

    /// The folder's own grants
    pub grants: Vec<Grant>,

    /// Child folders in insertion order
    pub children: Vec<FolderStructure>,
}

impl FolderStructure {
    /// Total number of folders in this structure, itself included.
    pub fn folder_count(&self) -> usize {
        1 + self.children.iter().map(FolderStructure::folder_count).sum::<usize>()
    }
}
