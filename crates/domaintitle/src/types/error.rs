/*! Error types for document and subscription operations. */

use super::NodeId;

/// Errors that can occur while talking to a document host.
///
/// The controller never surfaces these from its callbacks. They are logged
/// and the controller degrades to whatever state is still reachable.
#[derive(Debug, thiserror::Error)]
pub enum TitleError {
  #[error("Node not found: {0}")]
  NodeNotFound(NodeId),

  #[error("Node {0} is not a text node")]
  NotText(NodeId),

  #[error("Cannot insert {child} under {parent}: {reason}")]
  HierarchyViolation {
    parent: NodeId,
    child: NodeId,
    reason: String,
  },

  #[error("Subscription failed: {0}")]
  SubscribeFailed(String),

  #[error("Invalid location: {0}")]
  InvalidLocation(String),

  #[error("Invalid config: {0}")]
  InvalidConfig(#[from] serde_json::Error),
}

/// Result type for document and subscription operations.
pub type TitleResult<T> = Result<T, TitleError>;
