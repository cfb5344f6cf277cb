//! # Resource Tree
//!
//! The aggregate root of the folder hierarchy. Owns every node and enforces
//! the tree-wide invariants after each mutation:
//!
//! - exactly one root, and every other node reachable from it
//! - no cycles: a node is never its own ancestor
//! - every id is unique and each child appears in exactly one parent's list
//!
//! Paths are derived on each read by walking parent links, so a rename or
//! move is reflected in every descendant's path immediately.

use chrono::Utc;
use drive_acl::{effective_role, AccessControlList, AclResult, Principal, Role};
use drive_naming::NamingPolicy;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::error::{TreeError, TreeResult};
use crate::node::{NodeId, NodeSummary, ResourceNode};
use crate::snapshot::{TreeSnapshot, SNAPSHOT_FORMAT_VERSION};
use crate::templates::FolderTemplate;
use crate::traverse::Subtree;
use crate::view::FolderStructure;

/// Separator between path segments.
pub const PATH_SEPARATOR: &str = "/";

/// The folder hierarchy.
///
/// # Example
///
/// ```
/// use drive_acl::Principal;
/// use drive_naming::NamingPolicy;
/// use drive_tree::ResourceTree;
///
/// let policy = NamingPolicy::permissive();
/// let mut tree = ResourceTree::new("My Drive", Some(Principal::user("alice@x.com"))).unwrap();
///
/// let reports = tree.create_node(&policy, "Reports", tree.root(), None).unwrap();
/// let q1 = tree.create_node(&policy, "Q1", reports, None).unwrap();
/// assert_eq!(tree.path(q1).unwrap(), "My Drive/Reports/Q1");
///
/// tree.rename(&policy, reports, "Archive").unwrap();
/// assert_eq!(tree.path(q1).unwrap(), "My Drive/Archive/Q1");
/// ```
#[derive(Debug, Clone)]
pub struct ResourceTree {
    /// Root node ID
    root: NodeId,

    /// All nodes by ID
    nodes: HashMap<NodeId, ResourceNode>,

    /// Incremented on every successful mutation
    revision: u64,
}

impl ResourceTree {
    /// Create a tree holding only a root folder.
    ///
    /// The root name is a system name and is not checked against any policy.
    ///
    /// # Arguments
    ///
    /// * `root_name` - Display name of the root
    /// * `owner` - Principal granted `owner` on the root, if ownership is tracked
    ///
    /// # Returns
    ///
    /// The tree, or `InvalidOperation` if `owner` is not a user
    pub fn new(root_name: impl Into<String>, owner: Option<Principal>) -> TreeResult<Self> {
        let acl = owner_acl(owner)?;
        let root = ResourceNode::new(root_name.into(), None, acl);
        let root_id = root.id;

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);

        Ok(Self {
            root: root_id,
            nodes,
            revision: 0,
        })
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get the current revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> TreeResult<&ResourceNode> {
        self.nodes.get(&id).ok_or(TreeError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> TreeResult<&mut ResourceNode> {
        self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Direct children of a node in insertion order.
    pub fn children(&self, id: NodeId) -> TreeResult<Vec<&ResourceNode>> {
        let node = self.get(id)?;
        Ok(node.children.iter().filter_map(|c| self.nodes.get(c)).collect())
    }

    /// Ancestors of a node, root first, excluding the node itself.
    pub fn ancestors(&self, id: NodeId) -> TreeResult<Vec<&ResourceNode>> {
        let mut chain = Vec::new();
        let mut current = self.get(id)?.parent;

        while let Some(parent_id) = current {
            let parent = self
                .nodes
                .get(&parent_id)
                .ok_or_else(|| TreeError::Corrupt(format!("dangling parent {}", parent_id)))?;
            chain.push(parent);
            if chain.len() > self.nodes.len() {
                return Err(TreeError::Corrupt(format!("cycle above {}", id)));
            }
            current = parent.parent;
        }

        chain.reverse();
        Ok(chain)
    }

    /// Number of edges between the root and a node.
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.ancestors(id)?.len())
    }

    /// Slash-joined names from the root down to a node.
    pub fn path(&self, id: NodeId) -> TreeResult<String> {
        let node = self.get(id)?;
        let mut segments: Vec<&str> = self
            .ancestors(id)?
            .into_iter()
            .map(|n| n.name.as_str())
            .collect();
        segments.push(&node.name);
        Ok(segments.join(PATH_SEPARATOR))
    }

    /// Check if `candidate` lies strictly below `ancestor`.
    pub fn is_descendant(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes.get(&candidate).and_then(|n| n.parent);
        let mut steps = 0;

        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                break;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    /// Build the list-display summary of a node.
    pub fn summary(&self, id: NodeId) -> TreeResult<NodeSummary> {
        let node = self.get(id)?;
        Ok(NodeSummary {
            id: node.id,
            name: node.name.clone(),
            path: self.path(id)?,
            parent: node.parent,
            child_count: node.children.len(),
            visibility: node.acl.visibility(),
            modified_at: node.modified_at,
        })
    }

    /// Create a folder under `parent`.
    ///
    /// # Arguments
    ///
    /// * `policy` - Naming policy the name must satisfy
    /// * `name` - Folder name
    /// * `parent` - Parent folder
    /// * `owner` - Principal granted `owner` on the new folder, if tracked
    ///
    /// # Returns
    ///
    /// The new node's ID, `NodeNotFound` if the parent does not exist,
    /// `InvalidName` if the policy rejects the name, or `InvalidOperation` if
    /// `owner` is not a user
    pub fn create_node(
        &mut self,
        policy: &NamingPolicy,
        name: &str,
        parent: NodeId,
        owner: Option<Principal>,
    ) -> TreeResult<NodeId> {
        self.get(parent)?;
        policy.validate(name)?;
        let acl = owner_acl(owner)?;

        let id = self.insert_child(parent, name, acl);
        self.revision += 1;
        debug!(node_id = %id, parent_id = %parent, name, "Created folder");
        Ok(id)
    }

    /// Rename a folder. Every descendant path changes with it.
    pub fn rename(&mut self, policy: &NamingPolicy, id: NodeId, new_name: &str) -> TreeResult<()> {
        self.get(id)?;
        policy.validate(new_name)?;

        let node = self.get_mut(id)?;
        node.name = new_name.to_string();
        node.touch();
        self.revision += 1;
        debug!(node_id = %id, name = new_name, "Renamed folder");
        Ok(())
    }

    /// Move a folder under a new parent, keeping its own access-control list.
    ///
    /// # Returns
    ///
    /// `NodeNotFound` if either id is absent, `InvalidOperation` if the new
    /// parent is the folder itself or one of its descendants
    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId) -> TreeResult<()> {
        let old_parent = self.get(id)?.parent;
        self.get(new_parent)?;

        if new_parent == id || self.is_descendant(new_parent, id) {
            return Err(TreeError::InvalidOperation(format!(
                "cannot move {} into itself or one of its descendants",
                id
            )));
        }
        let old_parent = old_parent
            .ok_or_else(|| TreeError::InvalidOperation("the root folder cannot be moved".to_string()))?;
        if old_parent == new_parent {
            return Ok(());
        }

        self.get_mut(old_parent)?.children.retain(|c| *c != id);
        self.get_mut(new_parent)?.children.push(id);
        let node = self.get_mut(id)?;
        node.parent = Some(new_parent);
        node.touch();
        self.revision += 1;
        debug!(node_id = %id, from = %old_parent, to = %new_parent, "Moved folder");
        Ok(())
    }

    /// Delete a folder and its entire subtree.
    ///
    /// # Returns
    ///
    /// The removed IDs in pre-order, or `InvalidOperation` for the root
    pub fn delete(&mut self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let parent = self
            .get(id)?
            .parent
            .ok_or_else(|| TreeError::InvalidOperation("the root folder cannot be deleted".to_string()))?;

        let doomed: Vec<NodeId> = Subtree::new(&self.nodes, id).map(|n| n.id).collect();
        self.get_mut(parent)?.children.retain(|c| *c != id);
        for node_id in &doomed {
            self.nodes.remove(node_id);
        }
        self.revision += 1;
        debug!(node_id = %id, removed = doomed.len(), "Deleted folder subtree");
        Ok(doomed)
    }

    /// Lazy pre-order traversal starting at (and including) `id`.
    pub fn subtree(&self, id: NodeId) -> TreeResult<Subtree<'_>> {
        self.get(id)?;
        Ok(Subtree::new(&self.nodes, id))
    }

    /// Apply an edit to a node's access-control list.
    ///
    /// The edit either succeeds as a whole or leaves the list unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use drive_acl::{Principal, Role};
    /// use drive_tree::ResourceTree;
    ///
    /// let mut tree = ResourceTree::new("My Drive", None).unwrap();
    /// let root = tree.root();
    /// let grant = tree
    ///     .update_acl(root, |acl| acl.grant(Principal::user("bob@x.com"), Role::Reader).map(|g| g.clone()))
    ///     .unwrap();
    /// assert_eq!(grant.role, Role::Reader);
    /// ```
    pub fn update_acl<R, F>(&mut self, id: NodeId, edit: F) -> TreeResult<R>
    where
        F: FnOnce(&mut AccessControlList) -> AclResult<R>,
    {
        let node = self.get_mut(id)?;
        let mut acl = node.acl.clone();
        let result = edit(&mut acl)?;
        node.acl = acl;
        node.touch();
        self.revision += 1;
        Ok(result)
    }

    /// Resolve the role a principal effectively holds on a node.
    pub fn effective_role(&self, id: NodeId, principal: &Principal) -> TreeResult<Option<Role>> {
        let node = self.get(id)?;
        let ancestors = self.ancestors(id)?;
        Ok(effective_role(
            principal,
            &node.acl,
            ancestors.into_iter().map(|n| &n.acl),
        ))
    }

    /// Folders whose name contains `query` (case-insensitive), in pre-order.
    pub fn search(&self, query: &str) -> Vec<&ResourceNode> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        Subtree::new(&self.nodes, self.root)
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Folders explicitly shared with `principal` by someone else, in pre-order.
    ///
    /// Folders the principal owns are not included.
    pub fn shared_with(&self, principal: &Principal) -> Vec<&ResourceNode> {
        Subtree::new(&self.nodes, self.root)
            .filter(|n| n.acl.explicit_role(principal).is_some())
            .filter(|n| n.acl.owner().map_or(true, |o| &o.principal != principal))
            .collect()
    }

    /// Nested view of a folder and all of its descendants.
    pub fn structure(&self, id: NodeId) -> TreeResult<FolderStructure> {
        let path = self.path(id)?;
        Ok(self.build_structure(id, path))
    }

    fn build_structure(&self, id: NodeId, path: String) -> FolderStructure {
        let node = &self.nodes[&id];
        let children = node
            .children
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .map(|child| {
                let child_path = format!("{}{}{}", path, PATH_SEPARATOR, child.name);
                self.build_structure(child.id, child_path)
            })
            .collect();

        FolderStructure {
            id,
            name: node.name.clone(),
            path,
            visibility: node.acl.visibility(),
            grants: node.acl.grants().to_vec(),
            children,
        }
    }

    /// Create every folder of a template under `parent`.
    ///
    /// All names and the owner are validated before anything is inserted, so
    /// either every folder is created or none is.
    pub fn apply_template(
        &mut self,
        policy: &NamingPolicy,
        parent: NodeId,
        template: FolderTemplate,
        owner: Option<Principal>,
    ) -> TreeResult<Vec<NodeId>> {
        self.get(parent)?;
        for name in template.folders() {
            policy.validate(name)?;
        }
        let acls = template
            .folders()
            .iter()
            .map(|_| owner_acl(owner.clone()))
            .collect::<TreeResult<Vec<_>>>()?;

        let created: Vec<NodeId> = template
            .folders()
            .iter()
            .zip(acls)
            .map(|(name, acl)| self.insert_child(parent, name, acl))
            .collect();
        self.revision += 1;
        debug!(parent_id = %parent, template = ?template, created = created.len(), "Applied folder template");
        Ok(created)
    }

    fn insert_child(&mut self, parent: NodeId, name: &str, acl: AccessControlList) -> NodeId {
        let mut node = ResourceNode::new(name.to_string(), Some(parent), acl);
        while self.nodes.contains_key(&node.id) {
            node.id = NodeId::new();
        }
        let id = node.id;
        self.nodes.insert(id, node);
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
            parent.modified_at = Utc::now();
        }
        id
    }

    /// Check every structural invariant.
    ///
    /// # Returns
    ///
    /// `Corrupt` describing the first violation found
    pub fn verify(&self) -> TreeResult<()> {
        let root = self
            .nodes
            .get(&self.root)
            .ok_or_else(|| TreeError::Corrupt(format!("root {} missing", self.root)))?;
        if root.parent.is_some() {
            return Err(TreeError::Corrupt("root has a parent".to_string()));
        }

        for (key, node) in &self.nodes {
            if *key != node.id {
                return Err(TreeError::Corrupt(format!("node {} stored under {}", node.id, key)));
            }
            match node.parent {
                None if node.id != self.root => {
                    return Err(TreeError::Corrupt(format!("second root {}", node.id)));
                }
                None => {}
                Some(parent_id) => {
                    let parent = self
                        .nodes
                        .get(&parent_id)
                        .ok_or_else(|| TreeError::Corrupt(format!("dangling parent {} of {}", parent_id, node.id)))?;
                    let listed = parent.children.iter().filter(|c| **c == node.id).count();
                    if listed != 1 {
                        return Err(TreeError::Corrupt(format!(
                            "{} listed {} times under its parent {}",
                            node.id, listed, parent_id
                        )));
                    }
                }
            }
            for child_id in &node.children {
                let child = self
                    .nodes
                    .get(child_id)
                    .ok_or_else(|| TreeError::Corrupt(format!("dangling child {} of {}", child_id, node.id)))?;
                if child.parent != Some(node.id) {
                    return Err(TreeError::Corrupt(format!(
                        "{} lists {} as a child but it belongs elsewhere",
                        node.id, child_id
                    )));
                }
            }
            node.acl.verify()?;
        }

        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(TreeError::Corrupt(format!("{} reachable twice", id)));
            }
            stack.extend(self.nodes[&id].children.iter().copied());
        }
        if seen.len() != self.nodes.len() {
            return Err(TreeError::Corrupt(format!(
                "{} nodes unreachable from the root",
                self.nodes.len() - seen.len()
            )));
        }
        Ok(())
    }

    /// Serialize the whole tree.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            revision: self.revision,
            root: self.root,
            nodes: Subtree::new(&self.nodes, self.root).cloned().collect(),
            taken_at: Utc::now(),
        }
    }

    /// Rebuild a tree from a snapshot, re-verifying every invariant.
    pub fn from_snapshot(snapshot: TreeSnapshot) -> TreeResult<Self> {
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(TreeError::Corrupt(format!(
                "unsupported snapshot format {}",
                snapshot.format_version
            )));
        }

        let mut nodes = HashMap::with_capacity(snapshot.nodes.len());
        for node in snapshot.nodes {
            let id = node.id;
            if nodes.insert(id, node).is_some() {
                return Err(TreeError::Corrupt(format!("duplicate node id {}", id)));
            }
        }

        let tree = Self {
            root: snapshot.root,
            nodes,
            revision: snapshot.revision,
        };
        tree.verify()?;
        Ok(tree)
    }
}

/// A fresh private list, owned by `owner` when one is given.
fn owner_acl(owner: Option<Principal>) -> TreeResult<AccessControlList> {
    match owner {
        Some(owner) => Ok(AccessControlList::with_owner(owner)?),
        None => Ok(AccessControlList::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_acl::{Role, Visibility};

    fn policy() -> NamingPolicy {
        NamingPolicy::permissive()
    }

    /// root
    /// ├─ a
    /// │  ├─ a1
    /// │  │  └─ a1x
    /// │  └─ a2
    /// └─ b
    fn sample() -> (ResourceTree, [NodeId; 5]) {
        let p = policy();
        let mut tree = ResourceTree::new("Mi Unidad", Some(Principal::user("alice@x.com"))).unwrap();
        let root = tree.root();
        let a = tree.create_node(&p, "a", root, None).unwrap();
        let a1 = tree.create_node(&p, "a1", a, None).unwrap();
        let a1x = tree.create_node(&p, "a1x", a1, None).unwrap();
        let a2 = tree.create_node(&p, "a2", a, None).unwrap();
        let b = tree.create_node(&p, "b", root, None).unwrap();
        (tree, [a, a1, a1x, a2, b])
    }

    fn assert_single_rooted(tree: &ResourceTree) {
        tree.verify().unwrap();
        let max_depth = tree.node_count();
        for node in tree.subtree(tree.root()).unwrap() {
            let mut current = node.parent();
            let mut steps = 0;
            while let Some(id) = current {
                steps += 1;
                assert!(steps <= max_depth);
                current = tree.get(id).unwrap().parent();
            }
            assert_eq!(steps, tree.depth(node.id()).unwrap());
        }
    }

    #[test]
    fn test_new_tree_has_owned_private_root() {
        let tree = ResourceTree::new("Mi Unidad", Some(Principal::user("alice@x.com"))).unwrap();
        let root = tree.get(tree.root()).unwrap();
        assert!(root.is_root());
        assert_eq!(root.acl().visibility(), Visibility::Private);
        assert_eq!(root.acl().owner().unwrap().principal, Principal::user("alice@x.com"));
        assert_eq!(tree.path(tree.root()).unwrap(), "Mi Unidad");
    }

    #[test]
    fn test_create_node_builds_path_and_keeps_order() {
        let (tree, [a, a1, a1x, a2, _]) = sample();
        assert_eq!(tree.path(a1x).unwrap(), "Mi Unidad/a/a1/a1x");

        let names: Vec<_> = tree.children(a).unwrap().iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["a1", "a2"]);
        assert_eq!(tree.get(a2).unwrap().parent(), Some(a));
        assert_eq!(tree.depth(a1).unwrap(), 2);
        assert_single_rooted(&tree);
    }

    #[test]
    fn test_create_node_errors() {
        let (mut tree, _) = sample();
        let before = tree.node_count();

        let missing = NodeId::new();
        assert_eq!(
            tree.create_node(&policy(), "x", missing, None),
            Err(TreeError::NodeNotFound(missing))
        );

        let root = tree.root();
        let err = tree.create_node(&policy(), "bad:name", root, None).unwrap_err();
        assert!(matches!(err, TreeError::InvalidName { ref violations, .. }
            if violations == &vec!["reserved-characters".to_string()]));
        assert_eq!(tree.node_count(), before);
    }

    #[test]
    fn test_new_node_acl_starts_private_with_owner() {
        let (mut tree, _) = sample();
        let root = tree.root();
        let id = tree
            .create_node(&policy(), "owned", root, Some(Principal::user("bob@x.com")))
            .unwrap();
        let acl = tree.get(id).unwrap().acl();
        assert_eq!(acl.visibility(), Visibility::Private);
        assert_eq!(acl.len(), 1);
        assert_eq!(acl.owner().unwrap().principal, Principal::user("bob@x.com"));
    }

    #[test]
    fn test_non_user_owner_is_rejected() {
        assert!(matches!(
            ResourceTree::new("Mi Unidad", Some(Principal::Anyone)),
            Err(TreeError::InvalidOperation(_))
        ));

        let (mut tree, _) = sample();
        let root = tree.root();
        let before = (tree.node_count(), tree.revision());

        let err = tree
            .create_node(&policy(), "shared", root, Some(Principal::Anyone))
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidOperation(_)));

        let err = tree
            .apply_template(&policy(), root, FolderTemplate::Team, Some(Principal::group("team@x.com")))
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidOperation(_)));

        assert_eq!((tree.node_count(), tree.revision()), before);
        assert_single_rooted(&tree);
    }

    #[test]
    fn test_rename_updates_descendant_paths() {
        let (mut tree, [a, _, a1x, _, _]) = sample();
        tree.rename(&policy(), a, "renamed").unwrap();
        assert_eq!(tree.path(a1x).unwrap(), "Mi Unidad/renamed/a1/a1x");

        let err = tree.rename(&policy(), a, "").unwrap_err();
        assert!(matches!(err, TreeError::InvalidName { .. }));
        assert_eq!(tree.get(a).unwrap().name(), "renamed");

        let missing = NodeId::new();
        assert_eq!(tree.rename(&policy(), missing, "x"), Err(TreeError::NodeNotFound(missing)));
    }

    #[test]
    fn test_move_reparents_and_keeps_acl() {
        let (mut tree, [a, a1, a1x, _, b]) = sample();
        tree.update_acl(a1, |acl| acl.grant(Principal::user("bob@x.com"), Role::Writer).map(|_| ()))
            .unwrap();
        let acl_before = tree.get(a1).unwrap().acl().clone();

        tree.move_node(a1, b).unwrap();

        assert_eq!(tree.get(a1).unwrap().parent(), Some(b));
        assert!(!tree.get(a).unwrap().children().contains(&a1));
        assert_eq!(tree.get(b).unwrap().children(), &[a1]);
        assert_eq!(tree.path(a1x).unwrap(), "Mi Unidad/b/a1/a1x");
        assert_eq!(tree.get(a1).unwrap().acl(), &acl_before);
        assert_single_rooted(&tree);
    }

    #[test]
    fn test_move_into_own_subtree_fails_for_every_descendant() {
        let (mut tree, [a, ..]) = sample();
        let targets: Vec<NodeId> = tree.subtree(a).unwrap().map(|n| n.id()).collect();
        let revision = tree.revision();

        for target in targets {
            let err = tree.move_node(a, target).unwrap_err();
            assert!(matches!(err, TreeError::InvalidOperation(_)));
        }
        assert_eq!(tree.revision(), revision);
        assert_single_rooted(&tree);
    }

    #[test]
    fn test_move_root_fails() {
        let (mut tree, [_, _, _, _, b]) = sample();
        let root = tree.root();
        assert!(matches!(tree.move_node(root, b), Err(TreeError::InvalidOperation(_))));
    }

    #[test]
    fn test_move_missing_nodes() {
        let (mut tree, [a, ..]) = sample();
        let missing = NodeId::new();
        assert_eq!(tree.move_node(missing, a), Err(TreeError::NodeNotFound(missing)));
        assert_eq!(tree.move_node(a, missing), Err(TreeError::NodeNotFound(missing)));
    }

    #[test]
    fn test_delete_removes_exactly_the_subtree() {
        let (mut tree, [a, a1, a1x, a2, b]) = sample();
        let before = tree.node_count();
        let expected = tree.subtree(a).unwrap().count();

        let removed = tree.delete(a).unwrap();

        assert_eq!(removed, vec![a, a1, a1x, a2]);
        assert_eq!(removed.len(), expected);
        assert_eq!(tree.node_count(), before - expected);
        assert!(tree.contains(b));
        assert!(!tree.contains(a1x));
        assert_eq!(tree.get(tree.root()).unwrap().children(), &[b]);
        assert_single_rooted(&tree);
    }

    #[test]
    fn test_delete_root_fails() {
        let (mut tree, _) = sample();
        let root = tree.root();
        assert!(matches!(tree.delete(root), Err(TreeError::InvalidOperation(_))));
    }

    #[test]
    fn test_subtree_is_pre_order() {
        let (tree, [a, a1, a1x, a2, b]) = sample();
        let order: Vec<NodeId> = tree.subtree(tree.root()).unwrap().map(|n| n.id()).collect();
        assert_eq!(order, vec![tree.root(), a, a1, a1x, a2, b]);
    }

    #[test]
    fn test_effective_role_inherits_public_floor() {
        let (mut tree, [a, a1, a1x, _, _]) = sample();
        let root = tree.root();
        tree.update_acl(a1x, |acl| acl.grant(Principal::user("bob@x.com"), Role::Writer).map(|_| ()))
            .unwrap();
        tree.update_acl(a, |acl| Ok(acl.set_visibility(Visibility::Public))).unwrap();

        let carol = Principal::user("carol@x.com");
        assert_eq!(tree.effective_role(root, &carol).unwrap(), None);
        assert_eq!(tree.effective_role(a1, &carol).unwrap(), Some(Role::Reader));
        assert_eq!(
            tree.effective_role(a1x, &Principal::user("bob@x.com")).unwrap(),
            Some(Role::Writer)
        );
    }

    #[test]
    fn test_failed_acl_edit_leaves_list_untouched() {
        let (mut tree, _) = sample();
        let root = tree.root();
        let owner = tree.get(root).unwrap().acl().owner().unwrap().id;
        let revision = tree.revision();

        let err = tree.update_acl(root, |acl| acl.revoke(owner)).unwrap_err();
        assert!(matches!(err, TreeError::InvalidOperation(_)));
        assert_eq!(tree.revision(), revision);
        assert!(tree.get(root).unwrap().acl().owner().is_some());
    }

    #[test]
    fn test_search_and_shared_with() {
        let (mut tree, [a, a1, _, _, b]) = sample();
        let bob = Principal::user("bob@x.com");
        tree.update_acl(a1, |acl| acl.grant(bob.clone(), Role::Reader).map(|_| ())).unwrap();
        tree.update_acl(b, |acl| acl.grant(bob.clone(), Role::Owner).map(|_| ())).unwrap();

        let hits: Vec<NodeId> = tree.search("A1").iter().map(|n| n.id()).collect();
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&a1));
        assert!(tree.search("  ").is_empty());

        let shared: Vec<NodeId> = tree.shared_with(&bob).iter().map(|n| n.id()).collect();
        assert_eq!(shared, vec![a1]);
        assert!(!shared.contains(&a));
    }

    #[test]
    fn test_structure_nests_children() {
        let (tree, [a, ..]) = sample();
        let structure = tree.structure(a).unwrap();
        assert_eq!(structure.path, "Mi Unidad/a");
        assert_eq!(structure.folder_count(), 4);
        assert_eq!(structure.children[0].children[0].path, "Mi Unidad/a/a1/a1x");
    }

    #[test]
    fn test_apply_template_is_all_or_nothing() {
        let (mut tree, [_, _, _, _, b]) = sample();
        let created = tree
            .apply_template(&policy(), b, FolderTemplate::Client, None)
            .unwrap();
        assert_eq!(created.len(), 4);
        assert_eq!(tree.path(created[1]).unwrap(), "Mi Unidad/b/Billing");

        let strict = NamingPolicy::with_default_rules().unwrap();
        let before = tree.node_count();
        let err = tree
            .apply_template(&strict, b, FolderTemplate::Project, None)
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidName { .. }));
        assert_eq!(tree.node_count(), before);
    }

    #[test]
    fn test_snapshot_round_trip_verifies() {
        let (tree, [_, _, a1x, _, _]) = sample();
        let json = serde_json::to_string(&tree.snapshot()).unwrap();
        let restored = ResourceTree::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

        assert_eq!(restored.node_count(), tree.node_count());
        assert_eq!(restored.revision(), tree.revision());
        assert_eq!(restored.path(a1x).unwrap(), "Mi Unidad/a/a1/a1x");
    }

    #[test]
    fn test_from_snapshot_rejects_cycle() {
        let (tree, [a, a1, ..]) = sample();
        let mut snapshot = tree.snapshot();
        // Make a a child of a1 while a1 stays a child of a.
        for node in snapshot.nodes.iter_mut() {
            if node.id == a {
                node.parent = Some(a1);
            }
            if node.id == a1 {
                node.children.push(a);
            }
            if node.id == tree.root() {
                node.children.retain(|c| *c != a);
            }
        }
        assert!(matches!(ResourceTree::from_snapshot(snapshot), Err(TreeError::Corrupt(_))));
    }

    #[test]
    fn test_from_snapshot_rejects_second_root_and_duplicates() {
        let (tree, [_, _, _, _, b]) = sample();

        let mut two_roots = tree.snapshot();
        for node in two_roots.nodes.iter_mut() {
            if node.id == b {
                node.parent = None;
            }
        }
        assert!(matches!(ResourceTree::from_snapshot(two_roots), Err(TreeError::Corrupt(_))));

        let mut duplicated = tree.snapshot();
        let copy = duplicated.nodes[1].clone();
        duplicated.nodes.push(copy);
        assert!(matches!(ResourceTree::from_snapshot(duplicated), Err(TreeError::Corrupt(_))));
    }

    #[test]
    fn test_revision_advances_on_mutation() {
        let (mut tree, [a, ..]) = sample();
        let revision = tree.revision();
        tree.rename(&policy(), a, "again").unwrap();
        assert_eq!(tree.revision(), revision + 1);
    }
}
