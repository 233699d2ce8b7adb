//! Persistent joke store with change notifications.
//!
//! # Responsibility
//! - Own the SQLite connection and expose add/remove/query use-cases.
//! - Publish a change event after every committed mutation.
//!
//! # Invariants
//! - Every add/remove commits before its event is published.
//! - The store is passed explicitly to every view that needs it.

mod joke_store;
mod subscription;

pub use joke_store::{JokeStore, StoreResult};
pub use subscription::{StoreEvent, StoreSubscription};
