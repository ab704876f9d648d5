/*!
Change records delivered by a host's change-notification mechanism.

Records are batched per mutation turn and delivered in the order the host
produced them.
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::NodeId;

/// Node name hosts use for text nodes.
pub const TEXT_NODE_KIND: &str = "#text";

/// What kind of mutation a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MutationKind {
  /// Children were inserted into or removed from `target`.
  ChildList,
  /// The data of text node `target` changed.
  CharacterData,
}

/// A node as it looked when a mutation was recorded.
///
/// The kind is captured eagerly so consumers can classify added nodes even if
/// the node is gone by the time the record is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NodeRef {
  pub id: NodeId,
  /// Lowercase element name, or [`TEXT_NODE_KIND`] for text nodes.
  pub kind: String,
}

impl NodeRef {
  pub fn new(id: NodeId, kind: impl Into<String>) -> Self {
    Self {
      id,
      kind: kind.into(),
    }
  }

  /// Check if this node is of the given kind (ASCII case-insensitive, like HTML tag names).
  pub fn is_kind(&self, kind: &str) -> bool {
    self.kind.eq_ignore_ascii_case(kind)
  }
}

/// A single change observed within a watched scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MutationRecord {
  pub kind: MutationKind,
  /// Node whose children or data changed.
  pub target: NodeId,
  pub added: Vec<NodeRef>,
  pub removed: Vec<NodeRef>,
}

impl MutationRecord {
  /// Record a child-list change.
  pub fn child_list(target: NodeId, added: Vec<NodeRef>, removed: Vec<NodeRef>) -> Self {
    Self {
      kind: MutationKind::ChildList,
      target,
      added,
      removed,
    }
  }

  /// Record a text data change.
  pub const fn character_data(target: NodeId) -> Self {
    Self {
      kind: MutationKind::CharacterData,
      target,
      added: Vec::new(),
      removed: Vec::new(),
    }
  }
}

/// Which changes a subscription wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ObserveOptions {
  /// Child insertions/removals.
  pub child_list: bool,
  /// Extend observation from the target to all of its descendants.
  pub subtree: bool,
  /// Text data changes.
  pub character_data: bool,
}

impl ObserveOptions {
  /// The title node and everything below it, including text edits.
  pub const TITLE_SUBTREE: Self = Self {
    child_list: true,
    subtree: true,
    character_data: true,
  };

  /// Direct children of the head node only.
  pub const HEAD_CHILDREN: Self = Self {
    child_list: true,
    subtree: false,
    character_data: false,
  };

  /// Check if a mutation of `kind` is enabled by these options.
  pub const fn accepts(&self, kind: MutationKind) -> bool {
    match kind {
      MutationKind::ChildList => self.child_list,
      MutationKind::CharacterData => self.character_data,
    }
  }
}
