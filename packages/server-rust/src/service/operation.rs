//! Shared dispatch types: command paths, the error taxonomy, and batch reports.

use std::fmt;

use strata_core::{ActionReply, ReplyCode};

/// Which of a processor's two command paths a message resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandPath {
    Start,
    Stop,
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
        }
    }
}

/// A named precondition that a message violated.
///
/// Always recovered into an acknowledgment carrying `code` and `detail`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct ValidationFailure {
    pub code: ReplyCode,
    pub detail: String,
}

impl ValidationFailure {
    #[must_use]
    pub fn new(code: ReplyCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    /// The acknowledgment for this failure.
    #[must_use]
    pub fn to_reply(&self) -> ActionReply {
        ActionReply::new(self.code, self.detail.clone())
    }
}

/// Errors returned by validators and action effects.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A typed precondition failure; surfaced with its own code.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    /// Any other failure; surfaced as `KO_GENERAL_ERROR`.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ActionError {
    /// Shorthand for a validation failure.
    #[must_use]
    pub fn validation(code: ReplyCode, detail: impl Into<String>) -> Self {
        Self::Validation(ValidationFailure::new(code, detail))
    }
}

/// Errors raised while delivering an acknowledgment.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to encode acknowledgment: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("coordination store write failed at {path}")]
    Store {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

/// The only error that escapes a batch: an acknowledgment could not be
/// delivered. Messages after the failing one are not processed.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("processor {processor}: acknowledgment for request {request_id} in session {session_id} was not delivered")]
    Sink {
        processor: &'static str,
        session_id: String,
        request_id: String,
        #[source]
        source: SinkError,
    },
}

/// How a single message ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The operation matched no command path; nothing ran, nothing was sent.
    Dropped,
    /// The action ran. `acknowledged` is false when it returned `false`.
    Completed { acknowledged: bool },
    /// A validator or the action reported a validation failure.
    Rejected(ValidationFailure),
    /// An unclassified failure was converted into a general error reply.
    Failed { detail: String },
}

/// Per-batch tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub received: usize,
    pub dropped: usize,
    pub completed: usize,
    pub rejected: usize,
    pub failed: usize,
    /// Messages for which the sink was called.
    pub acknowledged: usize,
}

impl BatchReport {
    pub(crate) fn record(&mut self, outcome: &MessageOutcome) {
        self.received += 1;
        match outcome {
            MessageOutcome::Dropped => self.dropped += 1,
            MessageOutcome::Completed { acknowledged } => {
                self.completed += 1;
                if *acknowledged {
                    self.acknowledged += 1;
                }
            }
            MessageOutcome::Rejected(_) => {
                self.rejected += 1;
                self.acknowledged += 1;
            }
            MessageOutcome::Failed { .. } => {
                self.failed += 1;
                self.acknowledged += 1;
            }
        }
    }

    /// Adds another report's tallies to this one.
    pub fn merge(&mut self, other: &BatchReport) {
        self.received += other.received;
        self.dropped += other.dropped;
        self.completed += other.completed;
        self.rejected += other.rejected;
        self.failed += other.failed;
        self.acknowledged += other.acknowledged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_reply_keeps_code_and_detail() {
        let failure = ValidationFailure::new(ReplyCode::KoStreamDoesNotExist, "no such stream");
        let reply = failure.to_reply();
        assert_eq!(reply.code, ReplyCode::KoStreamDoesNotExist);
        assert_eq!(reply.detail.as_deref(), Some("no such stream"));
        assert_eq!(failure.to_string(), "no such stream");
    }

    #[test]
    fn internal_error_displays_source_message() {
        let err = ActionError::from(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn report_counts_acknowledged_outcomes() {
        let mut report = BatchReport::default();
        report.record(&MessageOutcome::Dropped);
        report.record(&MessageOutcome::Completed { acknowledged: true });
        report.record(&MessageOutcome::Completed { acknowledged: false });
        report.record(&MessageOutcome::Rejected(ValidationFailure::new(
            ReplyCode::KoParserError,
            "x",
        )));
        report.record(&MessageOutcome::Failed {
            detail: "boom".into(),
        });

        assert_eq!(
            report,
            BatchReport {
                received: 5,
                dropped: 1,
                completed: 2,
                rejected: 1,
                failed: 1,
                acknowledged: 3,
            }
        );
    }

    #[test]
    fn merge_adds_every_field() {
        let mut total = BatchReport {
            received: 1,
            completed: 1,
            acknowledged: 1,
            ..BatchReport::default()
        };
        total.merge(&BatchReport {
            received: 2,
            dropped: 2,
            ..BatchReport::default()
        });
        assert_eq!(total.received, 3);
        assert_eq!(total.dropped, 2);
        assert_eq!(total.completed, 1);
    }
}
