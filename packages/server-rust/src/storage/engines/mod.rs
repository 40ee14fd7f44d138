//! Concrete [`CoordinationStore`](super::CoordinationStore) implementations.

pub mod hashmap;

pub use hashmap::HashMapCoordinationStore;
