/*!
Host abstraction traits.

These traits define the contract between the controller and the environment
that owns the document. A browser binding, a test fake and the in-memory
[`MemoryDocument`](super::MemoryDocument) all implement them. Core code only
uses these traits, never a concrete host type.
*/

use std::sync::Arc;

use crate::types::{Location, MutationRecord, NodeId, ObserveOptions, SubscriptionId, TitleResult};

/// Callback invoked with one batch of change records per mutation turn.
pub type MutationCallback = Arc<dyn Fn(&[MutationRecord]) + Send + Sync>;

/// Read queries plus the single write the controller performs.
pub trait DocumentHost: Send + Sync + 'static {
  /// First node of `kind` in document order. Kind matching is ASCII case-insensitive.
  fn first_of_kind(&self, kind: &str) -> Option<NodeId>;

  /// Concatenated text of the node's descendants. None if the node no longer exists.
  fn text_content(&self, node: NodeId) -> Option<String>;

  /// Replace the node's text content.
  fn set_text_content(&self, node: NodeId, text: &str) -> TitleResult<()>;

  /// Current location record. Read fresh on every call.
  fn location(&self) -> Location;
}

/// Subtree change subscriptions.
///
/// Implementations must queue records and deliver them after the mutating call
/// has returned. Invoking a callback from inside the mutation would let the
/// controller's own title write re-enter it on the same stack.
pub trait ChangeNotifier: Send + Sync + 'static {
  /// Start observing `target` with `options`.
  fn subscribe(
    &self,
    target: NodeId,
    options: ObserveOptions,
    callback: MutationCallback,
  ) -> TitleResult<SubscriptionId>;

  /// Stop a subscription and discard its undelivered records. Unknown IDs are ignored.
  fn unsubscribe(&self, subscription: SubscriptionId);
}
