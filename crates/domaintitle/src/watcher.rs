/*!
Watch/unwatch for the two observation scopes.

At most one subscription is live. Every `watch_*` call tears down whatever was
active before subscribing, and dropping the watcher tears everything down.
*/

use std::sync::Arc;

use crate::host::{ChangeNotifier, MutationCallback};
use crate::types::{NodeId, ObserveOptions, SubscriptionId, TitleResult, WatchState};

#[derive(Debug, Clone, Copy)]
struct ActiveWatch {
  anchor: NodeId,
  subscription: SubscriptionId,
}

/// Owns the title-subtree and head-children subscriptions.
pub struct ChangeWatcher<N: ChangeNotifier> {
  notifier: Arc<N>,
  title: Option<ActiveWatch>,
  head: Option<ActiveWatch>,
}

impl<N: ChangeNotifier> std::fmt::Debug for ChangeWatcher<N> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ChangeWatcher")
      .field("title", &self.title)
      .field("head", &self.head)
      .finish_non_exhaustive()
  }
}

impl<N: ChangeNotifier> ChangeWatcher<N> {
  pub const fn new(notifier: Arc<N>) -> Self {
    Self {
      notifier,
      title: None,
      head: None,
    }
  }

  /// Tear down both subscriptions. Safe to call when neither is active.
  pub fn disconnect_all(&mut self) {
    if let Some(watch) = self.title.take() {
      self.notifier.unsubscribe(watch.subscription);
      log::debug!("Stopped watching title {}", watch.anchor);
    }
    if let Some(watch) = self.head.take() {
      self.notifier.unsubscribe(watch.subscription);
      log::debug!("Stopped watching head {}", watch.anchor);
    }
  }

  /// Watch the title node and its whole subtree.
  pub fn watch_title(&mut self, anchor: NodeId, on_change: MutationCallback) -> TitleResult<()> {
    self.disconnect_all();
    let subscription = self
      .notifier
      .subscribe(anchor, ObserveOptions::TITLE_SUBTREE, on_change)?;
    self.title = Some(ActiveWatch {
      anchor,
      subscription,
    });
    log::debug!("Watching title {anchor} ({subscription})");
    Ok(())
  }

  /// Watch the head's direct children. Returns false (and watches nothing) without an anchor.
  pub fn watch_head(
    &mut self,
    anchor: Option<NodeId>,
    on_change: MutationCallback,
  ) -> TitleResult<bool> {
    self.disconnect_all();
    let Some(anchor) = anchor else {
      return Ok(false);
    };
    let subscription = self
      .notifier
      .subscribe(anchor, ObserveOptions::HEAD_CHILDREN, on_change)?;
    self.head = Some(ActiveWatch {
      anchor,
      subscription,
    });
    log::debug!("Watching head {anchor} ({subscription})");
    Ok(true)
  }

  /// Which scope is live.
  pub const fn state(&self) -> WatchState {
    match (&self.title, &self.head) {
      (Some(_), _) => WatchState::WatchingTitle,
      (None, Some(_)) => WatchState::WatchingHead,
      (None, None) => WatchState::Unwatched,
    }
  }

  /// Node the live subscription is attached to.
  pub fn anchor(&self) -> Option<NodeId> {
    self.title.or(self.head).map(|w| w.anchor)
  }

  /// Title node being watched, if in title scope.
  pub fn watched_title(&self) -> Option<NodeId> {
    self.title.map(|w| w.anchor)
  }
}

impl<N: ChangeNotifier> Drop for ChangeWatcher<N> {
  fn drop(&mut self) {
    self.disconnect_all();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::host::MemoryDocument;
  use crate::types::{Location, MutationRecord};

  fn noop() -> MutationCallback {
    Arc::new(|_records: &[MutationRecord]| {})
  }

  fn doc() -> Arc<MemoryDocument> {
    MemoryDocument::with_title(Location::new("file", ""), "T")
  }

  #[test]
  fn starts_unwatched() {
    let doc = doc();
    let watcher = ChangeWatcher::new(Arc::clone(&doc));
    assert_eq!(watcher.state(), WatchState::Unwatched);
    assert_eq!(watcher.anchor(), None);
  }

  #[test]
  fn switching_scopes_keeps_one_subscription() {
    let doc = doc();
    let title = doc.first_of_kind("title").unwrap();
    let head = doc.first_of_kind("head");
    let mut watcher = ChangeWatcher::new(Arc::clone(&doc));

    watcher.watch_title(title, noop()).unwrap();
    assert_eq!(watcher.state(), WatchState::WatchingTitle);
    assert_eq!(doc.observer_count(), 1);

    assert!(watcher.watch_head(head, noop()).unwrap());
    assert_eq!(watcher.state(), WatchState::WatchingHead);
    assert_eq!(watcher.anchor(), head);
    assert_eq!(doc.observer_count(), 1);

    watcher.watch_title(title, noop()).unwrap();
    watcher.watch_title(title, noop()).unwrap();
    assert_eq!(watcher.watched_title(), Some(title));
    assert_eq!(doc.observer_count(), 1);
  }

  #[test]
  fn watch_head_without_anchor_is_inert() {
    let doc = doc();
    let title = doc.first_of_kind("title").unwrap();
    let mut watcher = ChangeWatcher::new(Arc::clone(&doc));
    watcher.watch_title(title, noop()).unwrap();

    assert!(!watcher.watch_head(None, noop()).unwrap());
    assert_eq!(watcher.state(), WatchState::Unwatched);
    assert_eq!(doc.observer_count(), 0);
  }

  #[test]
  fn disconnect_all_is_idempotent() {
    let doc = doc();
    let mut watcher = ChangeWatcher::new(Arc::clone(&doc));
    watcher.disconnect_all();
    watcher.watch_head(doc.first_of_kind("head"), noop()).unwrap();
    watcher.disconnect_all();
    watcher.disconnect_all();
    assert_eq!(watcher.state(), WatchState::Unwatched);
    assert_eq!(doc.observer_count(), 0);
  }

  #[test]
  fn failed_subscribe_leaves_nothing_active() {
    let doc = doc();
    let title = doc.first_of_kind("title").unwrap();
    let mut watcher = ChangeWatcher::new(Arc::clone(&doc));
    watcher.watch_title(title, noop()).unwrap();

    assert!(watcher.watch_title(NodeId(999), noop()).is_err());
    assert_eq!(watcher.state(), WatchState::Unwatched);
    assert_eq!(doc.observer_count(), 0);
  }

  #[test]
  fn drop_unsubscribes() {
    let doc = doc();
    {
      let mut watcher = ChangeWatcher::new(Arc::clone(&doc));
      watcher
        .watch_title(doc.first_of_kind("title").unwrap(), noop())
        .unwrap();
      assert_eq!(doc.observer_count(), 1);
    }
    assert_eq!(doc.observer_count(), 0);
  }
}
