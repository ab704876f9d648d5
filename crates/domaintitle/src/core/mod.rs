/*!
Controller - decides which scope to watch and keeps the title synchronized.

# States

- `Unwatched` - before `run()`, or when the document has neither title nor head.
- `WatchingTitle` - title exists. Synced on entry and after every subtree change.
- `WatchingHead` - no title yet. Waits for a title to be appended to the head.

Every transition goes through `dispatch`, which re-queries the anchors, so a
replaced or removed title is picked up the same way as a first appearance.

# Example

```
use domaintitle::{Controller, Location, MemoryDocument, WatchState};

let doc = MemoryDocument::with_title(Location::new("file", ""), "Static title");
let controller = Controller::new(doc.clone(), doc.clone());

assert_eq!(controller.run(), WatchState::WatchingTitle);
let title = doc.first_of_kind("title").unwrap();
assert_eq!(doc.text_content(title).as_deref(), Some("Static title - localpath"));
```
*/

use async_broadcast::{InactiveReceiver, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use crate::accessor::TreeAccessor;
use crate::config::Config;
use crate::host::{ChangeNotifier, DocumentHost, MutationCallback};
use crate::sync::{SyncOutcome, Synchronizer};
use crate::types::{Event, MutationKind, MutationRecord, NodeId, WatchState};
use crate::watcher::ChangeWatcher;


const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Keeps one document's title suffixed with its domain.
///
/// Clone is cheap (Arc bump). Subscriptions are torn down when the last clone
/// is dropped; callbacks only hold weak references.
pub struct Controller<H: DocumentHost, N: ChangeNotifier> {
  shared: Arc<Shared<H, N>>,
}

impl<H: DocumentHost, N: ChangeNotifier> Clone for Controller<H, N> {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
    }
  }
}

impl<H: DocumentHost, N: ChangeNotifier> std::fmt::Debug for Controller<H, N> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Controller")
      .field("state", &self.state())
      .finish_non_exhaustive()
  }
}

/// Builder for configuring a controller.
///
/// # Example
///
/// ```
/// use domaintitle::{ControllerBuilder, Location, MemoryDocument};
///
/// let doc = MemoryDocument::with_title(Location::new("https", "example.com"), "Home");
/// let controller = ControllerBuilder::new()
///     .separator(" | ")
///     .build(doc.clone(), doc.clone());
/// controller.run();
///
/// let title = doc.first_of_kind("title").unwrap();
/// assert_eq!(doc.text_content(title).as_deref(), Some("Home | example.com"));
/// ```
#[derive(Debug, Default, Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct ControllerBuilder {
  config: Config,
}

impl ControllerBuilder {
  /// Start from the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the whole configuration.
  pub fn config(mut self, config: Config) -> Self {
    self.config = config;
    self
  }

  /// Text between the original title and the domain. Default: `" - "`.
  pub fn separator(mut self, separator: impl Into<String>) -> Self {
    self.config.separator = separator.into();
    self
  }

  /// Domain used for `file:` documents. Default: `"localpath"`.
  pub fn file_label(mut self, label: impl Into<String>) -> Self {
    self.config.file_label = label.into();
    self
  }

  /// Node kind of the title anchor. Default: `"title"`.
  pub fn title_kind(mut self, kind: impl Into<String>) -> Self {
    self.config.title_kind = kind.into();
    self
  }

  /// Node kind of the head anchor. Default: `"head"`.
  pub fn head_kind(mut self, kind: impl Into<String>) -> Self {
    self.config.head_kind = kind.into();
    self
  }

  /// Build an idle controller. Nothing is watched until [`Controller::run`].
  #[must_use = "Controller must be stored to keep watching"]
  pub fn build<H: DocumentHost, N: ChangeNotifier>(
    self,
    host: Arc<H>,
    notifier: Arc<N>,
  ) -> Controller<H, N> {
    let (mut tx, rx) = async_broadcast::broadcast(EVENT_CHANNEL_CAPACITY);
    tx.set_overflow(true); // Drop oldest events when full

    Controller {
      shared: Arc::new(Shared {
        accessor: TreeAccessor::new(host, &self.config),
        synchronizer: Synchronizer::new(&self.config),
        watcher: Mutex::new(ChangeWatcher::new(notifier)),
        events_tx: tx,
        events_keepalive: rx.deactivate(),
        config: self.config,
      }),
    }
  }
}

impl<H: DocumentHost, N: ChangeNotifier> Controller<H, N> {
  /// Create a controller with default configuration.
  ///
  /// For custom configuration, use [`ControllerBuilder`].
  #[must_use = "Controller must be stored to keep watching"]
  pub fn new(host: Arc<H>, notifier: Arc<N>) -> Self {
    ControllerBuilder::default().build(host, notifier)
  }

  /// Pick a scope and start watching. Syncs immediately when a title exists.
  ///
  /// Calling again re-runs the decision from scratch.
  pub fn run(&self) -> WatchState {
    self.shared.run()
  }

  /// Tear down the live subscription.
  pub fn stop(&self) {
    let mut watcher = self.shared.watcher.lock();
    let before = (watcher.state(), watcher.anchor());
    watcher.disconnect_all();
    self.shared.emit_if_changed(&watcher, before);
  }

  /// Current watch state.
  pub fn state(&self) -> WatchState {
    self.shared.watcher.lock().state()
  }

  /// Subscribe to events from this controller.
  pub fn subscribe(&self) -> Receiver<Event> {
    self.shared.events_keepalive.activate_cloned()
  }

  /// Configuration this controller was built with.
  pub fn config(&self) -> &Config {
    &self.shared.config
  }
}

struct Shared<H: DocumentHost, N: ChangeNotifier> {
  accessor: TreeAccessor<H>,
  synchronizer: Synchronizer,
  watcher: Mutex<ChangeWatcher<N>>,
  events_tx: Sender<Event>,
  events_keepalive: InactiveReceiver<Event>,
  config: Config,
}

impl<H: DocumentHost, N: ChangeNotifier> Shared<H, N> {
  fn run(self: &Arc<Self>) -> WatchState {
    let mut watcher = self.watcher.lock();
    self.dispatch(&mut watcher)
  }

  /// Initial logic: title scope if a title exists, head scope otherwise.
  fn dispatch(self: &Arc<Self>, watcher: &mut ChangeWatcher<N>) -> WatchState {
    let before = (watcher.state(), watcher.anchor());

    match self.accessor.title_anchor() {
      Some(title) => {
        self.sync(title);
        if let Err(e) = watcher.watch_title(title, self.title_callback()) {
          log::warn!("Failed to watch title {title}: {e}");
        }
      }
      None => match watcher.watch_head(self.accessor.head_anchor(), self.head_callback()) {
        Ok(true) => {}
        Ok(false) => log::debug!("Document has no title or head, staying unwatched"),
        Err(e) => log::warn!("Failed to watch head: {e}"),
      },
    }

    self.emit_if_changed(watcher, before);
    watcher.state()
  }

  fn on_title_change(self: &Arc<Self>, records: &[MutationRecord]) {
    let mut watcher = self.watcher.lock();
    let Some(watched) = watcher.watched_title() else {
      return;
    };
    log::trace!("Title {watched} changed ({} records)", records.len());

    match self.accessor.title_anchor() {
      Some(current) if current == watched => self.sync(current),
      other => {
        log::debug!("Title anchor moved from {watched} to {other:?}, re-dispatching");
        self.dispatch(&mut watcher);
      }
    }
  }

  fn on_head_change(self: &Arc<Self>, records: &[MutationRecord]) {
    let mut watcher = self.watcher.lock();
    if watcher.state() != WatchState::WatchingHead {
      return;
    }

    let title_added = records
      .iter()
      .filter(|r| r.kind == MutationKind::ChildList)
      .flat_map(|r| &r.added)
      .any(|node| self.accessor.is_title_kind(&node.kind));

    if title_added {
      log::debug!("Title appeared under head, switching scope");
      self.dispatch(&mut watcher);
    }
  }

  /// Synchronize a title with the current domain. Failures are logged, never raised.
  fn sync(&self, title: NodeId) {
    let domain = self.accessor.current_domain();
    match self
      .synchronizer
      .synchronize(self.accessor.host().as_ref(), title, &domain)
    {
      Ok(SyncOutcome::Unchanged) => log::trace!("Title {title} already ends with {domain:?}"),
      Ok(SyncOutcome::Appended { before, after }) => {
        log::debug!("Title {title}: {before:?} -> {after:?}");
        self.emit(Event::TitleSynced {
          node_id: title,
          before,
          after,
          domain,
        });
      }
      Err(e) => log::warn!("Failed to synchronize title {title}: {e}"),
    }
  }

  fn title_callback(self: &Arc<Self>) -> MutationCallback {
    let weak: Weak<Self> = Arc::downgrade(self);
    Arc::new(move |records: &[MutationRecord]| {
      if let Some(shared) = weak.upgrade() {
        shared.on_title_change(records);
      }
    })
  }

  fn head_callback(self: &Arc<Self>) -> MutationCallback {
    let weak: Weak<Self> = Arc::downgrade(self);
    Arc::new(move |records: &[MutationRecord]| {
      if let Some(shared) = weak.upgrade() {
        shared.on_head_change(records);
      }
    })
  }

  fn emit_if_changed(&self, watcher: &ChangeWatcher<N>, before: (WatchState, Option<NodeId>)) {
    let after = (watcher.state(), watcher.anchor());
    if after != before {
      self.emit(Event::WatchChanged {
        state: after.0,
        anchor: after.1,
      });
    }
  }

  fn emit(&self, event: Event) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::error!(
          "Event channel overflow - events are being dropped. \
           Consider increasing EVENT_CHANNEL_CAPACITY or processing events faster."
        );
      }
    }
  }
}
