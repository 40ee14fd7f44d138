//! Strata Server: control-plane command dispatch, validation, and acknowledgments.

pub mod logging;
pub mod service;
pub mod storage;
pub mod streams;
pub mod traits;

pub use service::{ActionProcessor, ProcessorRegistry};
pub use storage::{CoordinationStore, HashMapCoordinationStore};
pub use streams::InMemoryStreamService;
pub use traits::{ServiceError, StreamOperationService};
