//! Stream definition processor: `CREATE` and `DROP`.

use std::sync::Arc;

use strata_core::stream_operations::definition;
use tracing::info;

use crate::service::ack::AcknowledgmentSink;
use crate::service::processor::ActionProcessor;
use crate::service::validation::builtin::require_stream;
use crate::service::validation::{StreamExists, StreamIsUserDefined, StreamNotExists};
use crate::traits::StreamOperationService;

/// Builds the processor that creates and drops user streams.
///
/// `CREATE` takes its column definitions from the message's typed columns.
/// `DROP` only applies to user-defined streams. Both acknowledge with `OK`.
#[must_use]
pub fn stream_definition_processor(
    service: Arc<dyn StreamOperationService>,
    sink: Arc<dyn AcknowledgmentSink>,
) -> ActionProcessor {
    let creator = Arc::clone(&service);
    let dropper = Arc::clone(&service);

    ActionProcessor::builder("stream_definition", Arc::clone(&service))
        .start(definition::CREATE, move |message| {
            let stream = require_stream(message)?;
            creator.create_stream(stream, &message.columns)?;
            info!(stream, columns = message.columns.len(), "stream defined");
            Ok(true)
        })
        .start_validator(Arc::new(StreamNotExists::new(Arc::clone(&service))))
        .stop(definition::DROP, move |message| {
            let stream = require_stream(message)?;
            dropper.drop_stream(stream)?;
            info!(stream, "stream dropped");
            Ok(true)
        })
        .stop_validator(Arc::new(StreamExists::new(Arc::clone(&service))))
        .stop_validator(Arc::new(StreamIsUserDefined::new(service)))
        .sink(sink)
        .build()
}
