//! Lazy pre-order traversal.

use std::collections::HashMap;

use crate::node::{NodeId, ResourceNode};

/// Pre-order iterator over a subtree: every parent is yielded before its
/// children, and siblings in insertion order.
///
/// Created by [`ResourceTree::subtree`](crate::ResourceTree::subtree).
#[derive(Debug, Clone)]
pub struct Subtree<'a> {
    nodes: &'a HashMap<NodeId, ResourceNode>,
    stack: Vec<NodeId>,
}

impl<'a> Subtree<'a> {
    pub(crate) fn new(nodes: &'a HashMap<NodeId, ResourceNode>, start: NodeId) -> Self {
        Self {
            nodes,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for Subtree<'a> {
    type Item = &'a ResourceNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some(node);
            }
        }
        None
    }
}
