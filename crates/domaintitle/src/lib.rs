/*!
domaintitle - keeps a document's title suffixed with the domain it came from

```
use domaintitle::{Controller, Location, MemoryDocument, WatchState};

// Any host implementing DocumentHost + ChangeNotifier works; MemoryDocument is built in
let doc = MemoryDocument::with_head(Location::parse("https://example.com/").unwrap());
let controller = Controller::new(doc.clone(), doc.clone());

// No title yet: wait for one to show up under <head>
assert_eq!(controller.run(), WatchState::WatchingHead);

let head = doc.first_of_kind("head").unwrap();
let title = doc.create_element("title");
doc.set_text_content(title, "Dashboard").unwrap();
doc.append_child(head, title).unwrap();

// Change notifications are delivered when the host runs a mutation turn
doc.settle();
assert_eq!(controller.state(), WatchState::WatchingTitle);
assert_eq!(doc.text_content(title).as_deref(), Some("Dashboard - example.com"));

// Events describe scope switches and rewrites
let _events = controller.subscribe();

// Subscriptions are torn down when the last controller clone is dropped
drop(controller);
assert_eq!(doc.observer_count(), 0);
```
*/

mod accessor;
mod config;
mod core;
mod host;
mod sync;
mod watcher;

mod types;
pub use types::*;

pub use crate::accessor::TreeAccessor;
pub use crate::config::Config;
pub use crate::core::{Controller, ControllerBuilder};
pub use crate::host::{ChangeNotifier, DocumentHost, MemoryDocument, MutationCallback, MAX_SETTLE_TURNS};
pub use crate::sync::{SyncOutcome, Synchronizer};
pub use crate::watcher::ChangeWatcher;
