//! Persisted tree layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::{NodeId, ResourceNode};

/// Current snapshot format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serialized form of a full tree.
///
/// Holds every node (id, name, parent, children order, access-control list,
/// timestamps). Loading goes through [`ResourceTree::from_snapshot`](crate::ResourceTree::from_snapshot),
/// which re-verifies every invariant instead of trusting the stored form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeSnapshot {
    /// Format version of this layout
    pub format_version: u32,

    /// Tree revision at the time of the snapshot
    pub revision: u64,

    /// Root node ID
    pub root: NodeId,

    /// All nodes, root first, in pre-order
    pub nodes: Vec<ResourceNode>,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}
