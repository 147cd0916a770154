//! In-memory storage for development and tests
//!
//! Implements both store traits over plain vectors behind `RwLock`s. No
//! persistence: state is lost on restart. Aggregation semantics (month
//! bucketing, ranking order, tie-breaks) match the SQLite backend so the
//! two are interchangeable behind the traits.

mod catalog_store;
mod event_store;

pub use catalog_store::MemCatalogStore;
pub use event_store::MemEventStore;
