use std::sync::Arc;

use parking_lot::RwLock;
use strata_core::StreamingMessage;
use tracing::info;

use super::operation::{BatchReport, DispatchError};
use super::processor::ActionProcessor;

// ---------------------------------------------------------------------------
// RegistryError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("processor {0} is already registered")]
    Duplicate(&'static str),
}

// ---------------------------------------------------------------------------
// ProcessorRegistry
// ---------------------------------------------------------------------------

/// Ordered set of processors that each see every batch.
///
/// Processor names are unique. Dispatch order is registration order.
pub struct ProcessorRegistry {
    processors: RwLock<Vec<Arc<ActionProcessor>>>,
}

impl ProcessorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            processors: RwLock::new(Vec::new()),
        }
    }

    /// Register a processor.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Duplicate` if a processor with the same name
    /// is already registered.
    pub fn register(&self, processor: ActionProcessor) -> Result<(), RegistryError> {
        let mut processors = self.processors.write();
        let name = processor.name();
        if processors.iter().any(|p| p.name() == name) {
            return Err(RegistryError::Duplicate(name));
        }
        info!(processor = name, commands = ?processor.commands(), "processor registered");
        processors.push(Arc::new(processor));
        Ok(())
    }

    /// Look up a processor by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<ActionProcessor>> {
        self.processors
            .read()
            .iter()
            .find(|p| p.name() == name)
            .cloned()
    }

    /// Names in dispatch order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.processors.read().iter().map(|p| p.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.read().is_empty()
    }

    /// Run every processor over `batch`, in registration order.
    ///
    /// Each processor sees the whole batch; messages it does not answer to
    /// are dropped by that processor only.
    ///
    /// # Errors
    ///
    /// Returns the first `DispatchError`. Processors after the failing one
    /// do not run.
    pub fn dispatch_all(
        &self,
        batch: &[StreamingMessage],
    ) -> Result<Vec<(&'static str, BatchReport)>, DispatchError> {
        // Snapshot: registration may happen concurrently with dispatch.
        let processors: Vec<Arc<ActionProcessor>> = self.processors.read().clone();
        processors
            .iter()
            .map(|p| p.process_batch(batch).map(|report| (p.name(), report)))
            .collect()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
