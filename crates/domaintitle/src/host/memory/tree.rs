/*!
Tree relationship management for the in-memory document.

Single source of truth for parent-child relationships. All mutations go
through methods that maintain bidirectional link invariants.

## Invariants

1. **Single parent**: a node has at most ONE parent. Moving a node means
   removing it first, then inserting it elsewhere.
2. **Bidirectional consistency**: If `parent_of[child] = parent`, then
   `children_of[parent]` contains `child`, and vice versa.
3. **Acyclic**: a node is never inserted under itself or its descendants.
*/

use crate::types::NodeId;
use std::collections::HashMap;

pub(super) struct NodeTree {
  parent_of: HashMap<NodeId, NodeId>,
  children_of: HashMap<NodeId, Vec<NodeId>>,
}

impl NodeTree {
  pub(super) fn new() -> Self {
    Self {
      parent_of: HashMap::new(),
      children_of: HashMap::new(),
    }
  }

  /// Get parent of a node.
  pub(super) fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.parent_of.get(&id).copied()
  }

  /// Get children of a node in order (empty slice if none).
  pub(super) fn children(&self, id: NodeId) -> &[NodeId] {
    self.children_of.get(&id).map_or(&[], Vec::as_slice)
  }

  /// Check if `ancestor` is `node` or one of its ancestors.
  pub(super) fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
      if id == ancestor {
        return true;
      }
      current = self.parent(id);
    }
    false
  }

  /// Append a child under a parent.
  ///
  /// - Same parent: no-op (idempotent)
  /// - No parent: appended as last child
  /// - Different parent or cycle: rejected and logged. Callers validate first.
  pub(super) fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
    if let Some(&existing_parent) = self.parent_of.get(&child) {
      if existing_parent != parent {
        log::error!(
          "append_child: node {child} already has parent {existing_parent}, \
           cannot append to {parent}. Remove it first."
        );
      }
      return false;
    }
    if self.is_inclusive_ancestor(child, parent) {
      log::error!("append_child: inserting {child} under {parent} would create a cycle");
      return false;
    }

    self.parent_of.insert(child, parent);
    self.children_of.entry(parent).or_default().push(child);
    true
  }

  /// Unlink a child from its parent. Returns false if it was not a child of `parent`.
  pub(super) fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
    if self.parent_of.get(&child) != Some(&parent) {
      return false;
    }
    self.parent_of.remove(&child);
    if let Some(siblings) = self.children_of.get_mut(&parent) {
      siblings.retain(|&sid| sid != child);
    }
    true
  }

  /// Unlink all children of a node. Returns them in their former order.
  pub(super) fn detach_children(&mut self, parent: NodeId) -> Vec<NodeId> {
    let children = self.children_of.remove(&parent).unwrap_or_default();
    for child in &children {
      self.parent_of.remove(child);
    }
    children
  }

  /// All nodes under `root` (inclusive) in document order.
  /// Iterative to avoid stack overflow on deep trees.
  pub(super) fn preorder(&self, root: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
      order.push(id);
      stack.extend(self.children(id).iter().rev().copied());
    }

    order
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn id(n: u32) -> NodeId {
    NodeId(n)
  }

  #[test]
  fn test_append_child() {
    let mut tree = NodeTree::new();
    assert!(tree.append_child(id(1), id(2)));
    assert!(tree.append_child(id(1), id(3)));

    assert_eq!(tree.parent(id(2)), Some(id(1)));
    assert_eq!(tree.parent(id(3)), Some(id(1)));
    assert_eq!(tree.children(id(1)), &[id(2), id(3)]);
  }

  #[test]
  fn test_append_child_idempotent() {
    let mut tree = NodeTree::new();
    tree.append_child(id(1), id(2));

    // Appending the same child to the same parent again is a no-op
    assert!(!tree.append_child(id(1), id(2)));
    assert_eq!(tree.children(id(1)), &[id(2)]);
  }

  #[test]
  fn test_append_child_rejects_different_parent() {
    let mut tree = NodeTree::new();
    tree.append_child(id(1), id(2));

    assert!(!tree.append_child(id(99), id(2)));

    assert_eq!(tree.parent(id(2)), Some(id(1)));
    assert_eq!(tree.children(id(99)), &[] as &[NodeId]);
  }

  #[test]
  fn test_append_child_rejects_cycle() {
    let mut tree = NodeTree::new();
    tree.append_child(id(1), id(2));
    tree.append_child(id(2), id(3));

    assert!(!tree.append_child(id(3), id(1)));
    assert!(!tree.append_child(id(3), id(3)));
    assert_eq!(tree.parent(id(1)), None);
  }

  #[test]
  fn test_remove_child() {
    let mut tree = NodeTree::new();
    tree.append_child(id(1), id(2));
    tree.append_child(id(1), id(3));

    assert!(!tree.remove_child(id(3), id(2)));
    assert!(tree.remove_child(id(1), id(2)));

    assert_eq!(tree.parent(id(2)), None);
    assert_eq!(tree.children(id(1)), &[id(3)]);
  }

  #[test]
  fn test_detach_children() {
    let mut tree = NodeTree::new();
    tree.append_child(id(1), id(2));
    tree.append_child(id(1), id(3));
    tree.append_child(id(3), id(4));

    assert_eq!(tree.detach_children(id(1)), vec![id(2), id(3)]);
    assert_eq!(tree.parent(id(2)), None);
    assert_eq!(tree.parent(id(3)), None);
    // Grandchildren stay attached to their own parent
    assert_eq!(tree.parent(id(4)), Some(id(3)));
    assert_eq!(tree.children(id(1)), &[] as &[NodeId]);
  }

  #[test]
  fn test_preorder_is_document_order() {
    let mut tree = NodeTree::new();
    // Build: 1 -> [2, 5], 2 -> [3, 4]
    tree.append_child(id(1), id(2));
    tree.append_child(id(1), id(5));
    tree.append_child(id(2), id(3));
    tree.append_child(id(2), id(4));

    assert_eq!(tree.preorder(id(1)), vec![id(1), id(2), id(3), id(4), id(5)]);
    assert!(tree.is_inclusive_ancestor(id(1), id(4)));
    assert!(!tree.is_inclusive_ancestor(id(5), id(4)));
  }
}
