//! # Drive Resource Tree
//!
//! This crate provides the folder hierarchy of the shared drive: a single
//! rooted, acyclic tree of folders, each carrying its own access-control list.
//!
//! ## Overview
//!
//! The drive-tree crate handles:
//! - **Nodes**: Folders with a name, a parent, ordered children, and an ACL
//! - **Tree**: Creation, rename, move, and subtree deletion with invariant checks
//! - **Traversal**: Lazy pre-order subtree iteration, paths, ancestry
//! - **Views**: List summaries and nested folder structures
//! - **Templates**: Predefined folder layouts applied atomically
//! - **Persistence**: Snapshots and the `TreeStore` load/save contract
//!
//! ## Architecture
//!
//! ```text
//! ResourceTree
//!   ├─ root: NodeId
//!   └─ nodes: NodeId → ResourceNode
//!                        ├─ parent (None only for the root)
//!                        ├─ children (insertion order)
//!                        └─ AccessControlList
//!
//! TreeStore ── load_tree / save_tree ──→ TreeSnapshot
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use drive_acl::Principal;
//! use drive_naming::NamingPolicy;
//! use drive_tree::{ResourceTree, TreeError};
//!
//! let policy = NamingPolicy::permissive();
//! let mut tree = ResourceTree::new("Mi Unidad", Some(Principal::user("alice@x.com"))).unwrap();
//! let root = tree.root();
//!
//! let projects = tree.create_node(&policy, "Projects", root, None).unwrap();
//! let nexus = tree.create_node(&policy, "Nexus", projects, None).unwrap();
//!
//! // A folder cannot be moved below itself
//! assert!(matches!(tree.move_node(projects, nexus), Err(TreeError::InvalidOperation(_))));
//!
//! // Deleting removes the whole subtree
//! assert_eq!(tree.delete(projects).unwrap().len(), 2);
//! assert_eq!(tree.node_count(), 1);
//! ```

pub mod error;
pub mod node;
pub mod snapshot;
pub mod store;
pub mod templates;
pub mod traverse;
pub mod tree;
pub mod view;

// Re-export main types for convenience
pub use error::{StoreError, StoreResult, TreeError, TreeResult};
pub use node::{NodeId, NodeSummary, ResourceNode};
pub use snapshot::{TreeSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use store::{JsonFileTreeStore, MemoryTreeStore, TreeStore};
pub use templates::FolderTemplate;
pub use traverse::Subtree;
pub use tree::{ResourceTree, PATH_SEPARATOR};
pub use view::FolderStructure;
