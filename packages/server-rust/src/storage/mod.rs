//! Coordination store for acknowledgments.
//!
//! - [`CoordinationStore`]: path-keyed node storage trait
//! - [`HashMapCoordinationStore`]: in-memory implementation
//! - [`AckRecord`]: the document written per acknowledgment

pub mod engine;
pub mod engines;
pub mod record;

pub use engine::*;
pub use engines::HashMapCoordinationStore;
pub use record::*;
