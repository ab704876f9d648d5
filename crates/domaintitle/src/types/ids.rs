/*! Branded ID types for nodes and subscriptions. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use ts_rs::TS;

/// Reference to a node in a host document.
///
/// Hosts decide how IDs map onto their own node handles. An ID may outlive
/// the node it names; queries against a dead ID return `None`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct NodeId(pub u32);

/// Handle for a live change subscription.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct SubscriptionId(pub u32);

/// Global counter for `SubscriptionId` generation. Starts at 1 (0 could be confused with "null").
static SUBSCRIPTION_COUNTER: AtomicU32 = AtomicU32::new(1);

impl SubscriptionId {
  /// Generate a new unique `SubscriptionId`.
  pub fn new() -> Self {
    Self(SUBSCRIPTION_COUNTER.fetch_add(1, Ordering::Relaxed))
  }
}

impl Default for SubscriptionId {
  fn default() -> Self {
    Self::new()
  }
}
