//! The action processor: per-record command dispatch with validation and
//! acknowledgment.
//!
//! A processor is configuration, not a subtype. It binds up to two command
//! paths (start/stop), each with its own [`ValidatorChain`] and action
//! effect, plus one [`AcknowledgmentSink`]. [`ActionProcessor::process_batch`]
//! is the single dispatch routine shared by every processor.
//!
//! For each message, in batch order:
//!
//! 1. Classify the operation against the start name, then the stop name.
//!    No match: drop silently.
//! 2. Run the path's chain. The first validation failure is acknowledged
//!    with its own code and the action is skipped.
//! 3. Run the action. `Ok(true)` is acknowledged with `OK`; `Ok(false)`
//!    leaves acknowledgment to the action.
//! 4. A validation failure returned by the action is acknowledged with its
//!    code; any other error becomes `KO_GENERAL_ERROR` with the error text.
//!
//! Only a sink failure stops the batch.

use std::sync::Arc;

use strata_core::{ActionReply, ReplyCode, StreamingMessage};
use tracing::{debug, error, trace, warn};

use super::ack::{AcknowledgmentSink, LogOnlySink};
use super::classify::CommandNames;
use super::operation::{
    ActionError, BatchReport, CommandPath, DispatchError, MessageOutcome,
};
use super::validation::{
    ChainOutcome, StreamAllowed, StreamNameNotNull, Validator, ValidatorChain,
};
use crate::traits::StreamOperationService;

/// An action effect. Returns whether the default `OK` acknowledgment should
/// be sent.
pub type ActionFn = Arc<dyn Fn(&StreamingMessage) -> Result<bool, ActionError> + Send + Sync>;

/// Chain and action bound to one command path.
#[derive(Clone)]
struct PathBinding {
    chain: ValidatorChain,
    action: ActionFn,
}

// ---------------------------------------------------------------------------
// ActionProcessor
// ---------------------------------------------------------------------------

/// Dispatches batches of control messages to start/stop actions.
///
/// Immutable after [`ActionProcessorBuilder::build`]. Cloning is cheap and
/// clones share validators, actions, and sink.
#[derive(Clone)]
pub struct ActionProcessor {
    name: &'static str,
    commands: CommandNames,
    start: Option<PathBinding>,
    stop: Option<PathBinding>,
    sink: Arc<dyn AcknowledgmentSink>,
}

impl ActionProcessor {
    /// Start building a processor. Both chains begin with the built-in
    /// validators, which consult `service`.
    #[must_use]
    pub fn builder(
        name: &'static str,
        service: Arc<dyn StreamOperationService>,
    ) -> ActionProcessorBuilder {
        ActionProcessorBuilder::new(name, service)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn commands(&self) -> &CommandNames {
        &self.commands
    }

    /// The chain for `path`, or `None` if the processor has no such path.
    #[must_use]
    pub fn chain(&self, path: CommandPath) -> Option<&ValidatorChain> {
        self.binding(path).map(|b| &b.chain)
    }

    fn binding(&self, path: CommandPath) -> Option<&PathBinding> {
        match path {
            CommandPath::Start => self.start.as_ref(),
            CommandPath::Stop => self.stop.as_ref(),
        }
    }

    /// Process every message of `batch` in order.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Sink` if an acknowledgment could not be
    /// delivered. Messages after that one are left unprocessed.
    pub fn process_batch<'a, I>(&self, batch: I) -> Result<BatchReport, DispatchError>
    where
        I: IntoIterator<Item = &'a StreamingMessage>,
    {
        let mut report = BatchReport::default();
        for message in batch {
            let outcome = self.process_message(message)?;
            report.record(&outcome);
        }
        if report.received > 0 {
            debug!(
                processor = self.name,
                received = report.received,
                dropped = report.dropped,
                completed = report.completed,
                rejected = report.rejected,
                failed = report.failed,
                "batch processed"
            );
        }
        Ok(report)
    }

    /// Process one message.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Sink` if the acknowledgment could not be
    /// delivered.
    pub fn process_message(&self, message: &StreamingMessage) -> Result<MessageOutcome, DispatchError> {
        let Some((path, binding)) = self
            .commands
            .classify(message)
            .and_then(|path| self.binding(path).map(|b| (path, b)))
        else {
            trace!(
                processor = self.name,
                operation = message.operation().unwrap_or_default(),
                "no command path matched"
            );
            return Ok(MessageOutcome::Dropped);
        };

        debug!(
            processor = self.name,
            path = %path,
            request_id = %message.request_id,
            session_id = %message.session_id,
            "validating request"
        );

        let (outcome, reply) = match Self::execute(binding, message) {
            Ok(true) => (
                MessageOutcome::Completed { acknowledged: true },
                Some(ActionReply::ok()),
            ),
            Ok(false) => (MessageOutcome::Completed { acknowledged: false }, None),
            Err(ActionError::Validation(failure)) => {
                warn!(
                    processor = self.name,
                    request_id = %message.request_id,
                    code = failure.code.code(),
                    detail = %failure.detail,
                    "request rejected"
                );
                let reply = failure.to_reply();
                (MessageOutcome::Rejected(failure), Some(reply))
            }
            Err(ActionError::Internal(err)) => {
                error!(
                    processor = self.name,
                    request_id = %message.request_id,
                    session_id = %message.session_id,
                    error = %format!("{err:#}"),
                    "request failed"
                );
                let detail = err.to_string();
                let reply = ActionReply::new(ReplyCode::KoGeneralError, detail.clone());
                (MessageOutcome::Failed { detail }, Some(reply))
            }
        };

        if let Some(reply) = reply {
            self.sink
                .acknowledge(message, &reply)
                .map_err(|source| DispatchError::Sink {
                    processor: self.name,
                    session_id: message.session_id.clone(),
                    request_id: message.request_id.clone(),
                    source,
                })?;
        }
        Ok(outcome)
    }

    /// Run the chain, then the action.
    fn execute(binding: &PathBinding, message: &StreamingMessage) -> Result<bool, ActionError> {
        match binding.chain.run(message)? {
            ChainOutcome::Passed => (binding.action)(message),
            ChainOutcome::Failed(failure) => Err(ActionError::Validation(failure)),
        }
    }
}

impl std::fmt::Debug for ActionProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionProcessor")
            .field("name", &self.name)
            .field("commands", &self.commands)
            .field("start_chain", &self.start.as_ref().map(|b| &b.chain))
            .field("stop_chain", &self.stop.as_ref().map(|b| &b.chain))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ActionProcessorBuilder
// ---------------------------------------------------------------------------

/// Assembles an [`ActionProcessor`].
///
/// Built-in validators are placed at the head of both chains; validators
/// added here are appended after them in registration order. Validators for
/// a path without a command are discarded. The default sink is
/// [`LogOnlySink`].
pub struct ActionProcessorBuilder {
    name: &'static str,
    service: Arc<dyn StreamOperationService>,
    start: Option<(String, ActionFn)>,
    stop: Option<(String, ActionFn)>,
    start_validators: Vec<Arc<dyn Validator>>,
    stop_validators: Vec<Arc<dyn Validator>>,
    sink: Arc<dyn AcknowledgmentSink>,
}

impl ActionProcessorBuilder {
    fn new(name: &'static str, service: Arc<dyn StreamOperationService>) -> Self {
        Self {
            name,
            service,
            start: None,
            stop: None,
            start_validators: Vec::new(),
            stop_validators: Vec::new(),
            sink: Arc::new(LogOnlySink),
        }
    }

    /// Bind the start path.
    #[must_use]
    pub fn start<F>(mut self, command: impl Into<String>, action: F) -> Self
    where
        F: Fn(&StreamingMessage) -> Result<bool, ActionError> + Send + Sync + 'static,
    {
        self.start = Some((command.into(), Arc::new(action)));
        self
    }

    /// Bind the stop path.
    #[must_use]
    pub fn stop<F>(mut self, command: impl Into<String>, action: F) -> Self
    where
        F: Fn(&StreamingMessage) -> Result<bool, ActionError> + Send + Sync + 'static,
    {
        self.stop = Some((command.into(), Arc::new(action)));
        self
    }

    /// Append a validator to the start chain.
    #[must_use]
    pub fn start_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.start_validators.push(validator);
        self
    }

    /// Append a validator to the stop chain.
    #[must_use]
    pub fn stop_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.stop_validators.push(validator);
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn AcknowledgmentSink>) -> Self {
        self.sink = sink;
        self
    }

    fn builtins(&self) -> [Arc<dyn Validator>; 2] {
        [
            Arc::new(StreamNameNotNull),
            Arc::new(StreamAllowed::new(Arc::clone(&self.service))),
        ]
    }

    fn bind(
        builtins: [Arc<dyn Validator>; 2],
        path: Option<(String, ActionFn)>,
        extras: Vec<Arc<dyn Validator>>,
    ) -> (Option<String>, Option<PathBinding>) {
        match path {
            Some((command, action)) => {
                let chain = ValidatorChain::builder()
                    .extend(builtins)
                    .extend(extras)
                    .build();
                (Some(command), Some(PathBinding { chain, action }))
            }
            None => (None, None),
        }
    }

    #[must_use]
    pub fn build(self) -> ActionProcessor {
        let start_builtins = self.builtins();
        let stop_builtins = self.builtins();
        let (start_name, start) = Self::bind(start_builtins, self.start, self.start_validators);
        let (stop_name, stop) = Self::bind(stop_builtins, self.stop, self.stop_validators);

        let processor = ActionProcessor {
            name: self.name,
            commands: CommandNames {
                start: start_name,
                stop: stop_name,
            },
            start,
            stop,
            sink: self.sink,
        };
        debug!(processor = ?processor, "processor built");
        processor
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
