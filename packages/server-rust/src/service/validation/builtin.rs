//! Stream-level validators.
//!
//! `StreamNameNotNull` and `StreamAllowed` head every processor's chains;
//! the rest are appended by concrete processors.

use std::sync::Arc;

use strata_core::{ReplyCode, StreamingMessage};

use super::Validator;
use crate::service::operation::ActionError;
use crate::traits::StreamOperationService;

/// The stream name, or the same failure `StreamNameNotNull` reports.
pub(crate) fn require_stream(message: &StreamingMessage) -> Result<&str, ActionError> {
    message
        .stream_name()
        .ok_or_else(|| ActionError::validation(ReplyCode::KoParserError, "stream name is required"))
}

/// Rejects messages without a stream name.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamNameNotNull;

impl Validator for StreamNameNotNull {
    fn name(&self) -> &'static str {
        "stream_name_not_null"
    }

    fn validate(&self, message: &StreamingMessage) -> Result<(), ActionError> {
        require_stream(message).map(|_| ())
    }
}

/// Rejects operations the target stream does not currently admit.
pub struct StreamAllowed {
    service: Arc<dyn StreamOperationService>,
}

impl StreamAllowed {
    #[must_use]
    pub fn new(service: Arc<dyn StreamOperationService>) -> Self {
        Self { service }
    }
}

impl Validator for StreamAllowed {
    fn name(&self) -> &'static str {
        "stream_allowed"
    }

    fn validate(&self, message: &StreamingMessage) -> Result<(), ActionError> {
        let stream = require_stream(message)?;
        let operation = message.operation().unwrap_or_default();
        if self.service.is_operation_allowed(stream, operation) {
            Ok(())
        } else {
            Err(ActionError::validation(
                ReplyCode::KoStreamOperationNotAllowed,
                format!("operation {operation} is not allowed on stream {stream}"),
            ))
        }
    }
}

/// Requires the target stream to exist.
pub struct StreamExists {
    service: Arc<dyn StreamOperationService>,
}

impl StreamExists {
    #[must_use]
    pub fn new(service: Arc<dyn StreamOperationService>) -> Self {
        Self { service }
    }
}

impl Validator for StreamExists {
    fn name(&self) -> &'static str {
        "stream_exists"
    }

    fn validate(&self, message: &StreamingMessage) -> Result<(), ActionError> {
        let stream = require_stream(message)?;
        if self.service.stream_exists(stream) {
            Ok(())
        } else {
            Err(ActionError::validation(
                ReplyCode::KoStreamDoesNotExist,
                format!("stream {stream} does not exist"),
            ))
        }
    }
}

/// Requires the target stream to not exist yet.
pub struct StreamNotExists {
    service: Arc<dyn StreamOperationService>,
}

impl StreamNotExists {
    #[must_use]
    pub fn new(service: Arc<dyn StreamOperationService>) -> Self {
        Self { service }
    }
}

impl Validator for StreamNotExists {
    fn name(&self) -> &'static str {
        "stream_not_exists"
    }

    fn validate(&self, message: &StreamingMessage) -> Result<(), ActionError> {
        let stream = require_stream(message)?;
        if self.service.stream_exists(stream) {
            Err(ActionError::validation(
                ReplyCode::KoStreamAlreadyExists,
                format!("stream {stream} already exists"),
            ))
        } else {
            Ok(())
        }
    }
}

/// Requires the target stream to be user defined (not engine-owned).
pub struct StreamIsUserDefined {
    service: Arc<dyn StreamOperationService>,
}

impl StreamIsUserDefined {
    #[must_use]
    pub fn new(service: Arc<dyn StreamOperationService>) -> Self {
        Self { service }
    }
}

impl Validator for StreamIsUserDefined {
    fn name(&self) -> &'static str {
        "stream_is_user_defined"
    }

    fn validate(&self, message: &StreamingMessage) -> Result<(), ActionError> {
        let stream = require_stream(message)?;
        if self.service.is_user_defined(stream) {
            Ok(())
        } else {
            Err(ActionError::validation(
                ReplyCode::KoStreamIsNotUserDefined,
                format!("stream {stream} is not user defined"),
            ))
        }
    }
}
