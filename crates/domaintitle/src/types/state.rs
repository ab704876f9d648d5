/*! Watch state of the controller. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which subscription, if any, is currently live.
///
/// At most one scope is watched at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WatchState {
  /// No subscription. Either not started or the document has neither anchor.
  #[default]
  Unwatched,
  /// Watching the title node and its subtree.
  WatchingTitle,
  /// Watching the head's direct children, waiting for a title to appear.
  WatchingHead,
}
