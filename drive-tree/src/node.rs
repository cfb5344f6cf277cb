//! Resource node domain models
//!
//! This module provides the folder node stored in a [`ResourceTree`](crate::ResourceTree)
//! and the lightweight summary handed to list displays.

use chrono::{DateTime, Utc};
use drive_acl::{AccessControlList, Visibility};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque node identifier, immutable after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a new node id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse from the hyphenated UUID form.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A folder in the containment tree.
///
/// Nodes are only mutated through [`ResourceTree`](crate::ResourceTree), which
/// keeps the parent and children links consistent. The path is never stored;
/// see [`ResourceTree::path`](crate::ResourceTree::path).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceNode {
    /// Unique identifier
    pub(crate) id: NodeId,

    /// Display name
    pub(crate) name: String,

    /// Parent folder, `None` only for the root
    pub(crate) parent: Option<NodeId>,

    /// Child folders in insertion order
    #[serde(default)]
    pub(crate) children: Vec<NodeId>,

    /// This node's own access-control list
    #[serde(default)]
    pub(crate) acl: AccessControlList,

    /// When the node was created
    pub(crate) created_at: DateTime<Utc>,

    /// When the node was last renamed, moved, or re-shared
    pub(crate) modified_at: DateTime<Utc>,
}

impl ResourceNode {
    pub(crate) fn new(name: String, parent: Option<NodeId>, acl: AccessControlList) -> Self {
        let now = Utc::now();
        Self {
            id: NodeId::new(),
            name,
            parent,
            children: Vec::new(),
            acl,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn acl(&self) -> &AccessControlList {
        &self.acl
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Check if this is the root node.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// Summary of a node for list displays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeSummary {
    /// Node ID
    pub id: NodeId,

    /// Display name
    pub name: String,

    /// Slash-joined path from the root
    pub path: String,

    /// Parent ID
    pub parent: Option<NodeId>,

    /// Number of direct children
    pub child_count: usize,

    /// Visibility of the node's own list
    pub visibility: Visibility,

    /// Last modification time
    pub modified_at: DateTime<Utc>,
}
