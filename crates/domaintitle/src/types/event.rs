/*! Events emitted by the controller. */

use serde::Serialize;
use ts_rs::TS;

use super::{NodeId, WatchState};

/// Events emitted when the controller changes scope or rewrites the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum Event {
  /// The live subscription moved to a new scope.
  #[serde(rename = "watch:changed")]
  WatchChanged {
    state: WatchState,
    /// Node the new subscription is attached to. None when unwatched.
    anchor: Option<NodeId>,
  },

  /// The title text was rewritten to carry the domain suffix.
  #[serde(rename = "title:synced")]
  TitleSynced {
    node_id: NodeId,
    before: String,
    after: String,
    domain: String,
  },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serializes_with_event_tag() {
    let event = Event::WatchChanged {
      state: WatchState::WatchingHead,
      anchor: Some(NodeId(2)),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "watch:changed");
    assert_eq!(json["data"]["state"], "watching_head");
    assert_eq!(json["data"]["anchor"], 2);
  }
}
