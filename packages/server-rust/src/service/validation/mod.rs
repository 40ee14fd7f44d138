//! Message validators and the fail-fast chain that runs them.
//!
//! A [`ValidatorChain`] is assembled once when a processor is built and never
//! changes afterwards. Validators run in insertion order; the first
//! [`ValidationFailure`] stops the chain.

pub mod builtin;

use std::sync::Arc;

use strata_core::StreamingMessage;
use tracing::debug;

use super::operation::{ActionError, ValidationFailure};

pub use builtin::{
    StreamAllowed, StreamExists, StreamIsUserDefined, StreamNameNotNull, StreamNotExists,
};

// ---------------------------------------------------------------------------
// Validator trait
// ---------------------------------------------------------------------------

/// A single precondition over a message.
///
/// `name()` is the validator's identity: a chain holds at most one validator
/// per name. Implementations must not mutate external state.
pub trait Validator: Send + Sync {
    /// Stable identifier used to deduplicate chain members.
    fn name(&self) -> &'static str;

    /// Check the precondition.
    ///
    /// # Errors
    ///
    /// `ActionError::Validation` when the precondition is violated;
    /// `ActionError::Internal` when it could not be evaluated.
    fn validate(&self, message: &StreamingMessage) -> Result<(), ActionError>;
}

// ---------------------------------------------------------------------------
// ValidatorChain
// ---------------------------------------------------------------------------

/// Outcome of running a chain over one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Passed,
    /// The first violated precondition. Later validators did not run.
    Failed(ValidationFailure),
}

/// Ordered, duplicate-free, immutable sequence of validators.
///
/// Cloning is cheap; clones share the same validator instances.
#[derive(Clone, Default)]
pub struct ValidatorChain {
    validators: Vec<Arc<dyn Validator>>,
}

impl ValidatorChain {
    #[must_use]
    pub fn builder() -> ValidatorChainBuilder {
        ValidatorChainBuilder::default()
    }

    /// Run every validator in order, stopping at the first validation failure.
    ///
    /// # Errors
    ///
    /// Propagates `ActionError::Internal` from a validator unchanged; the
    /// validators after it do not run.
    pub fn run(&self, message: &StreamingMessage) -> Result<ChainOutcome, ActionError> {
        for validator in &self.validators {
            match validator.validate(message) {
                Ok(()) => {}
                Err(ActionError::Validation(failure)) => {
                    debug!(
                        validator = validator.name(),
                        code = failure.code.code(),
                        "validator rejected message"
                    );
                    return Ok(ChainOutcome::Failed(failure));
                }
                Err(other) => return Err(other),
            }
        }
        Ok(ChainOutcome::Passed)
    }

    /// Validator names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for ValidatorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Collects validators for a [`ValidatorChain`].
#[derive(Default)]
pub struct ValidatorChainBuilder {
    validators: Vec<Arc<dyn Validator>>,
}

impl ValidatorChainBuilder {
    /// Append a validator. A validator whose name is already present is
    /// skipped, so the first registration keeps its position.
    #[must_use]
    pub fn push(mut self, validator: Arc<dyn Validator>) -> Self {
        let name = validator.name();
        if self.validators.iter().any(|v| v.name() == name) {
            debug!(validator = name, "duplicate validator skipped");
        } else {
            self.validators.push(validator);
        }
        self
    }

    /// Append several validators in order, with the same deduplication as `push`.
    #[must_use]
    pub fn extend<I>(self, validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        validators.into_iter().fold(self, Self::push)
    }

    #[must_use]
    pub fn build(self) -> ValidatorChain {
        ValidatorChain {
            validators: self.validators,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
