/*! Core types for domain title synchronization.

Regenerate TypeScript types: `cargo test` (ts-rs exports on test).
*/

#![allow(missing_docs)]

mod error;
mod event;
mod ids;
mod location;
mod mutation;
mod state;

pub use error::{TitleError, TitleResult};
pub use event::Event;
pub use ids::{NodeId, SubscriptionId};
pub use location::{Location, Scheme};
pub use mutation::{MutationKind, MutationRecord, NodeRef, ObserveOptions, TEXT_NODE_KIND};
pub use state::WatchState;
