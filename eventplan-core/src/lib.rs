//! Core of eventplan: events, guests and cost-bearing items.
//!
//! - `event`: the data model (`Event` owns its `Guest`s and `Item`s)
//! - `store`: `EventStore`, the single mutator, which keeps guest counters in step
//! - `persist`: snapshot persistence (`PersistentStore`, `Storage`)
//! - `validation`: email/phone checks and input parsing run before the store
//! - `cost`: totals and per-person splits
//! - `config`: global configuration

pub mod config;
pub mod cost;
pub mod error;
pub mod event;
pub mod persist;
pub mod store;
pub mod validation;

pub use error::{PlannerError, PlannerResult, ValidationError};
pub use event::{Event, EventKind, EventPatch, Guest, GuestStatus, Item, Person};
pub use persist::{FileStorage, MemoryStorage, PersistentStore, Storage};
pub use store::{EventStore, StoreState};
