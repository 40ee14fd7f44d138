//! Acknowledgment sinks.
//!
//! The dispatch loop always hands its reply to an [`AcknowledgmentSink`];
//! which sink a processor uses decides whether anything is persisted.

use std::sync::Arc;

use strata_core::{ActionReply, StreamingMessage};
use tracing::debug;

use super::operation::SinkError;
use crate::storage::{join_path, now_millis, AckRecord, CoordinationStore};

/// Delivers the reply for one message.
///
/// Any `Fn(&StreamingMessage, &ActionReply) -> Result<(), SinkError>` is a sink.
pub trait AcknowledgmentSink: Send + Sync {
    /// Deliver `reply` for `message`.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the reply could not be delivered. The caller
    /// has no other channel to report through, so this aborts the batch.
    fn acknowledge(&self, message: &StreamingMessage, reply: &ActionReply) -> Result<(), SinkError>;
}

impl<F> AcknowledgmentSink for F
where
    F: Fn(&StreamingMessage, &ActionReply) -> Result<(), SinkError> + Send + Sync,
{
    fn acknowledge(&self, message: &StreamingMessage, reply: &ActionReply) -> Result<(), SinkError> {
        self(message, reply)
    }
}

// ---------------------------------------------------------------------------
// CoordinationSink
// ---------------------------------------------------------------------------

/// Writes an [`AckRecord`] to the coordination store at
/// `{root}/{session_id}/{request_id}`.
pub struct CoordinationSink {
    store: Arc<dyn CoordinationStore>,
    root: String,
}

impl CoordinationSink {
    #[must_use]
    pub fn new(store: Arc<dyn CoordinationStore>, root: impl Into<String>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    /// Store path for the reply to `message`.
    #[must_use]
    pub fn path_for(&self, message: &StreamingMessage) -> String {
        join_path(&self.root, &[&message.session_id, &message.request_id])
    }
}

impl AcknowledgmentSink for CoordinationSink {
    fn acknowledge(&self, message: &StreamingMessage, reply: &ActionReply) -> Result<(), SinkError> {
        let path = self.path_for(message);
        let data = serde_json::to_vec(&AckRecord::new(message, reply, now_millis()))?;
        self.store
            .put(&path, data)
            .map_err(|source| SinkError::Store {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path, code = reply.code.code(), "acknowledgment written");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LogOnlySink
// ---------------------------------------------------------------------------

/// Logs the reply and writes nothing. For high-volume paths where one store
/// node per record is too expensive.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlySink;

impl AcknowledgmentSink for LogOnlySink {
    fn acknowledge(&self, message: &StreamingMessage, reply: &ActionReply) -> Result<(), SinkError> {
        debug!(
            request_id = %message.request_id,
            session_id = %message.session_id,
            code = reply.code.code(),
            detail = reply.detail.as_deref().unwrap_or_default(),
            "acknowledgment not persisted"
        );
        Ok(())
    }
}
