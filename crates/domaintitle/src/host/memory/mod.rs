/*!
In-memory document host.

A small mutable node tree with mutation-observer style subscriptions. Mutations
queue records on every matching observer; nothing is delivered until the owner
runs a mutation turn with [`MemoryDocument::deliver_pending`] or drains the queue
with [`MemoryDocument::settle`].

## Example

```
use domaintitle::{Location, MemoryDocument};

let doc = MemoryDocument::with_title(Location::new("file", ""), "Static title");
let title = doc.first_of_kind("title").unwrap();
assert_eq!(doc.text_content(title).as_deref(), Some("Static title"));
```
*/

mod tree;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::{ChangeNotifier, DocumentHost, MutationCallback};
use crate::types::{
  Location, MutationRecord, NodeId, NodeRef, ObserveOptions, SubscriptionId, TitleError,
  TitleResult, TEXT_NODE_KIND,
};
use tree::NodeTree;

/// Upper bound on mutation turns run by [`MemoryDocument::settle`].
pub const MAX_SETTLE_TURNS: usize = 64;

const DOCUMENT_NODE_KIND: &str = "#document";

enum NodeData {
  Document,
  Element(String),
  Text(String),
}

impl NodeData {
  fn kind(&self) -> &str {
    match self {
      Self::Document => DOCUMENT_NODE_KIND,
      Self::Element(name) => name,
      Self::Text(_) => TEXT_NODE_KIND,
    }
  }
}

struct Observer {
  id: SubscriptionId,
  target: NodeId,
  options: ObserveOptions,
  callback: MutationCallback,
  pending: Vec<MutationRecord>,
}

struct Inner {
  root: NodeId,
  next_id: u32,
  nodes: HashMap<NodeId, NodeData>,
  tree: NodeTree,
  location: Location,
  /// In subscription order. Delivery follows this order.
  observers: Vec<Observer>,
}

impl Inner {
  fn alloc(&mut self, data: NodeData) -> NodeId {
    let id = NodeId(self.next_id);
    self.next_id += 1;
    self.nodes.insert(id, data);
    id
  }

  fn node(&self, id: NodeId) -> TitleResult<&NodeData> {
    self.nodes.get(&id).ok_or(TitleError::NodeNotFound(id))
  }

  fn node_ref(&self, id: NodeId) -> NodeRef {
    let kind = self.nodes.get(&id).map_or("", NodeData::kind);
    NodeRef::new(id, kind)
  }

  fn text_of(&self, id: NodeId) -> Option<String> {
    match self.nodes.get(&id)? {
      NodeData::Document => None,
      NodeData::Text(data) => Some(data.clone()),
      NodeData::Element(_) => Some(
        self
          .tree
          .preorder(id)
          .into_iter()
          .filter_map(|n| match self.nodes.get(&n) {
            Some(NodeData::Text(data)) => Some(data.as_str()),
            _ => None,
          })
          .collect(),
      ),
    }
  }

  /// Queue a record on every observer whose scope covers the target.
  fn queue(&mut self, record: MutationRecord) {
    let tree = &self.tree;
    for observer in &mut self.observers {
      if !observer.options.accepts(record.kind) {
        continue;
      }
      let in_scope = observer.target == record.target
        || (observer.options.subtree && tree.is_inclusive_ancestor(observer.target, record.target));
      if in_scope {
        observer.pending.push(record.clone());
      }
    }
  }

  /// DOM "replace all" with a single text node (or nothing for an empty string).
  fn replace_text(&mut self, node: NodeId, text: &str) -> TitleResult<()> {
    if matches!(self.node(node)?, NodeData::Text(_)) {
      return self.set_data(node, text);
    }

    let removed: Vec<NodeRef> = self
      .tree
      .detach_children(node)
      .into_iter()
      .map(|id| self.node_ref(id))
      .collect();

    let mut added = Vec::new();
    if !text.is_empty() {
      let text_node = self.alloc(NodeData::Text(text.to_owned()));
      self.tree.append_child(node, text_node);
      added.push(self.node_ref(text_node));
    }

    if !added.is_empty() || !removed.is_empty() {
      self.queue(MutationRecord::child_list(node, added, removed));
    }
    Ok(())
  }

  fn set_data(&mut self, node: NodeId, data: &str) -> TitleResult<()> {
    match self.nodes.get_mut(&node) {
      Some(NodeData::Text(current)) => {
        data.clone_into(current);
      }
      Some(_) => return Err(TitleError::NotText(node)),
      None => return Err(TitleError::NodeNotFound(node)),
    }
    self.queue(MutationRecord::character_data(node));
    Ok(())
  }
}

/// In-memory document implementing both host traits.
///
/// Cheap to share behind an `Arc`; all state sits behind one lock, which is never
/// held while callbacks run.
pub struct MemoryDocument {
  inner: Mutex<Inner>,
}

impl std::fmt::Debug for MemoryDocument {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let inner = self.inner.lock();
    f.debug_struct("MemoryDocument")
      .field("nodes", &inner.nodes.len())
      .field("observers", &inner.observers.len())
      .field("location", &inner.location)
      .finish_non_exhaustive()
  }
}

impl MemoryDocument {
  /// Create a document containing only an `html` element.
  pub fn new(location: Location) -> Arc<Self> {
    let mut inner = Inner {
      root: NodeId(0),
      next_id: 1,
      nodes: HashMap::new(),
      tree: NodeTree::new(),
      location,
      observers: Vec::new(),
    };
    let root = inner.alloc(NodeData::Document);
    let html = inner.alloc(NodeData::Element("html".into()));
    inner.root = root;
    inner.tree.append_child(root, html);

    Arc::new(Self {
      inner: Mutex::new(inner),
    })
  }

  /// Create `html > head` with no title.
  pub fn with_head(location: Location) -> Arc<Self> {
    let doc = Self::new(location);
    {
      let mut inner = doc.inner.lock();
      let root = inner.root;
      let html = inner.tree.children(root).first().copied().unwrap_or(root);
      let head = inner.alloc(NodeData::Element("head".into()));
      inner.tree.append_child(html, head);
    }
    doc
  }

  /// Create `html > head > title` with the given title text.
  pub fn with_title(location: Location, title: &str) -> Arc<Self> {
    let doc = Self::with_head(location);
    {
      let mut inner = doc.inner.lock();
      let head = inner
        .tree
        .preorder(inner.root)
        .into_iter()
        .find(|id| matches!(inner.nodes.get(id), Some(NodeData::Element(name)) if name == "head"))
        .unwrap_or(inner.root);
      let title_node = inner.alloc(NodeData::Element("title".into()));
      inner.tree.append_child(head, title_node);
      if !title.is_empty() {
        let text = inner.alloc(NodeData::Text(title.to_owned()));
        inner.tree.append_child(title_node, text);
      }
    }
    doc
  }

  /// The document node.
  pub fn root(&self) -> NodeId {
    self.inner.lock().root
  }

  /// First node of `kind` in document order.
  pub fn first_of_kind(&self, kind: &str) -> Option<NodeId> {
    let inner = self.inner.lock();
    inner
      .tree
      .preorder(inner.root)
      .into_iter()
      .find(|id| matches!(inner.nodes.get(id), Some(NodeData::Element(name)) if name.eq_ignore_ascii_case(kind)))
  }

  /// Text of a node and its descendants. None for missing nodes and the document node.
  pub fn text_content(&self, node: NodeId) -> Option<String> {
    self.inner.lock().text_of(node)
  }

  /// Node name (`"title"`, `"#text"`, ...). None if the node does not exist.
  pub fn kind_of(&self, node: NodeId) -> Option<String> {
    self.inner.lock().nodes.get(&node).map(|n| n.kind().to_owned())
  }

  /// Children of a node in order.
  pub fn children(&self, node: NodeId) -> Vec<NodeId> {
    self.inner.lock().tree.children(node).to_vec()
  }

  /// Parent of a node, if attached.
  pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
    self.inner.lock().tree.parent(node)
  }

  /// Create a detached element. Names are stored lowercase.
  pub fn create_element(&self, name: &str) -> NodeId {
    self
      .inner
      .lock()
      .alloc(NodeData::Element(name.to_ascii_lowercase()))
  }

  /// Create a detached text node.
  pub fn create_text(&self, data: &str) -> NodeId {
    self.inner.lock().alloc(NodeData::Text(data.to_owned()))
  }

  /// Append a detached node as the last child of `parent`.
  pub fn append_child(&self, parent: NodeId, child: NodeId) -> TitleResult<()> {
    let mut inner = self.inner.lock();
    if let NodeData::Text(_) = inner.node(parent)? {
      return Err(TitleError::HierarchyViolation {
        parent,
        child,
        reason: "text nodes cannot have children".into(),
      });
    }
    inner.node(child)?;
    if inner.tree.parent(child).is_some() {
      return Err(TitleError::HierarchyViolation {
        parent,
        child,
        reason: "node already has a parent".into(),
      });
    }
    if inner.tree.is_inclusive_ancestor(child, parent) {
      return Err(TitleError::HierarchyViolation {
        parent,
        child,
        reason: "node is an ancestor of the parent".into(),
      });
    }

    inner.tree.append_child(parent, child);
    let added = vec![inner.node_ref(child)];
    inner.queue(MutationRecord::child_list(parent, added, Vec::new()));
    Ok(())
  }

  /// Detach `child` from `parent`. The node stays alive and can be re-inserted.
  pub fn remove_child(&self, parent: NodeId, child: NodeId) -> TitleResult<()> {
    let mut inner = self.inner.lock();
    inner.node(parent)?;
    inner.node(child)?;
    if !inner.tree.remove_child(parent, child) {
      return Err(TitleError::HierarchyViolation {
        parent,
        child,
        reason: "node is not a child of the parent".into(),
      });
    }
    let removed = vec![inner.node_ref(child)];
    inner.queue(MutationRecord::child_list(parent, Vec::new(), removed));
    Ok(())
  }

  /// Replace all children of `node` with one text node (`textContent = ...`).
  ///
  /// On a text node this sets its data instead.
  pub fn set_text_content(&self, node: NodeId, text: &str) -> TitleResult<()> {
    self.inner.lock().replace_text(node, text)
  }

  /// Set the data of a text node.
  pub fn set_data(&self, node: NodeId, data: &str) -> TitleResult<()> {
    self.inner.lock().set_data(node, data)
  }

  /// Current location record.
  pub fn location(&self) -> Location {
    self.inner.lock().location.clone()
  }

  /// Replace the location record (navigation within the same document).
  pub fn set_location(&self, location: Location) {
    self.inner.lock().location = location;
  }

  /// Number of live subscriptions.
  pub fn observer_count(&self) -> usize {
    self.inner.lock().observers.len()
  }

  /// Number of records waiting for the next mutation turn.
  pub fn pending_count(&self) -> usize {
    self
      .inner
      .lock()
      .observers
      .iter()
      .map(|o| o.pending.len())
      .sum()
  }

  /// Run one mutation turn. Returns the number of records delivered.
  ///
  /// Each observer's queue is taken right before its callback runs, so a
  /// callback that unsubscribes a later observer also drops that observer's
  /// records. Records produced by callbacks wait for the next turn.
  pub fn deliver_pending(&self) -> usize {
    let order: Vec<SubscriptionId> = self.inner.lock().observers.iter().map(|o| o.id).collect();
    let mut delivered = 0;

    for id in order {
      // Take the batch under the lock, invoke with the lock released
      let batch = {
        let mut inner = self.inner.lock();
        inner
          .observers
          .iter_mut()
          .find(|o| o.id == id)
          .filter(|o| !o.pending.is_empty())
          .map(|o| (Arc::clone(&o.callback), std::mem::take(&mut o.pending)))
      };

      if let Some((callback, records)) = batch {
        delivered += records.len();
        callback(records.as_slice());
      }
    }

    delivered
  }

  /// Run mutation turns until no records are pending. Returns the number of turns that delivered.
  pub fn settle(&self) -> usize {
    let mut turns = 0;
    while self.deliver_pending() > 0 {
      turns += 1;
      if turns >= MAX_SETTLE_TURNS {
        log::warn!(
          "MemoryDocument did not settle after {MAX_SETTLE_TURNS} turns ({} records pending)",
          self.pending_count()
        );
        break;
      }
    }
    turns
  }
}

impl DocumentHost for MemoryDocument {
  fn first_of_kind(&self, kind: &str) -> Option<NodeId> {
    Self::first_of_kind(self, kind)
  }

  fn text_content(&self, node: NodeId) -> Option<String> {
    self.inner.lock().text_of(node)
  }

  fn set_text_content(&self, node: NodeId, text: &str) -> TitleResult<()> {
    self.inner.lock().replace_text(node, text)
  }

  fn location(&self) -> Location {
    self.inner.lock().location.clone()
  }
}

impl ChangeNotifier for MemoryDocument {
  fn subscribe(
    &self,
    target: NodeId,
    options: ObserveOptions,
    callback: MutationCallback,
  ) -> TitleResult<SubscriptionId> {
    let mut inner = self.inner.lock();
    if !inner.nodes.contains_key(&target) {
      return Err(TitleError::SubscribeFailed(format!(
        "target node {target} does not exist"
      )));
    }

    let id = SubscriptionId::new();
    inner.observers.push(Observer {
      id,
      target,
      options,
      callback,
      pending: Vec::new(),
    });
    log::trace!("Subscribed {id} on node {target} ({options:?})");
    Ok(id)
  }

  fn unsubscribe(&self, subscription: SubscriptionId) {
    let mut inner = self.inner.lock();
    let before = inner.observers.len();
    inner.observers.retain(|o| o.id != subscription);
    if inner.observers.len() != before {
      log::trace!("Unsubscribed {subscription}");
    }
  }
}
