/*!
Document hosts.

- `traits.rs` - `DocumentHost` / `ChangeNotifier` contracts
- `memory/` - in-memory document with queued mutation delivery
*/

mod memory;
mod traits;

pub use memory::{MemoryDocument, MAX_SETTLE_TURNS};
pub use traits::{ChangeNotifier, DocumentHost, MutationCallback};
