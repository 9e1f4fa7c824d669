//! Calendar sync engine: local event store, window controller, mutation
//! reconciliation.
//!
//! The engine mirrors a remote calendar into an in-memory store, refetches
//! it on navigation with last-window-wins ordering, and applies
//! create/update/cancel mutations with single-key reconciliation.

pub mod controller;
pub mod engine;
pub mod error;
pub mod store;

pub use controller::{FetchPhase, FetchTag, WindowController};
pub use engine::{CalendarEngine, ReconciliationStrategy};
pub use error::{EngineError, EngineResult};
pub use store::EventStore;
