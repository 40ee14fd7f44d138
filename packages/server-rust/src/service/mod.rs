//! Control-message dispatch framework.
//!
//! A batch of [`StreamingMessage`](strata_core::StreamingMessage)s flows
//! through each registered processor:
//!
//! 1. **Classification** (`classify`): operation token -> start/stop path
//! 2. **Validation** (`validation`): fail-fast chain, built-ins first
//! 3. **Action** (`processor`): the path's effect
//! 4. **Acknowledgment** (`ack`): reply delivered to the processor's sink
//!
//! Concrete processors live in `domain`; `registry` runs them in order.

pub mod ack;
pub mod classify;
pub mod config;
pub mod domain;
pub mod operation;
pub mod processor;
pub mod registry;
pub mod validation;

// Re-export key types for convenient access.
pub use ack::{AcknowledgmentSink, CoordinationSink, LogOnlySink};
pub use classify::CommandNames;
pub use config::EngineConfig;
pub use operation::{
    ActionError, BatchReport, CommandPath, DispatchError, MessageOutcome, SinkError,
    ValidationFailure,
};
pub use processor::{ActionFn, ActionProcessor, ActionProcessorBuilder};
pub use registry::{ProcessorRegistry, RegistryError};
pub use validation::{Validator, ValidatorChain};
