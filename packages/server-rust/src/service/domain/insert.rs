//! Insert processor: submits one event per `INSERT` message.

use std::sync::Arc;

use strata_core::stream_operations::manipulation;
use tracing::debug;

use crate::service::ack::{AcknowledgmentSink, CoordinationSink, LogOnlySink};
use crate::service::config::EngineConfig;
use crate::service::processor::ActionProcessor;
use crate::service::validation::builtin::require_stream;
use crate::service::validation::StreamExists;
use crate::storage::CoordinationStore;
use crate::traits::StreamOperationService;

/// Builds the insert processor.
///
/// The action never requests the default acknowledgment: inserts are
/// high-volume, so only rejections are reported. With
/// `acknowledge_inserts` unset, even those are logged rather than stored.
#[must_use]
pub fn insert_processor(
    service: Arc<dyn StreamOperationService>,
    config: &EngineConfig,
    store: Arc<dyn CoordinationStore>,
) -> ActionProcessor {
    let sink: Arc<dyn AcknowledgmentSink> = if config.acknowledge_inserts {
        Arc::new(CoordinationSink::new(store, config.coordination_root.clone()))
    } else {
        Arc::new(LogOnlySink)
    };

    let target = Arc::clone(&service);
    ActionProcessor::builder("insert", Arc::clone(&service))
        .start(manipulation::INSERT, move |message| {
            let stream = require_stream(message)?;
            target.send(stream, &message.columns)?;
            debug!(stream, columns = message.columns.len(), "event inserted");
            Ok(false)
        })
        .start_validator(Arc::new(StreamExists::new(service)))
        .sink(sink)
        .build()
}
