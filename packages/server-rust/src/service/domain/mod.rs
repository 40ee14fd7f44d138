//! Concrete processors.
//!
//! Each constructor returns a configured
//! [`ActionProcessor`](crate::service::processor::ActionProcessor) that adds
//! nothing beyond command names, extra validators, actions and a sink.

pub mod definition;
pub mod insert;

use strata_core::ReplyCode;

use crate::service::operation::ActionError;
use crate::traits::ServiceError;

pub use definition::stream_definition_processor;
pub use insert::insert_processor;

/// Service errors reach the acknowledgment with the most specific reply
/// code available. Only `Internal` falls through to `KO_GENERAL_ERROR`.
impl From<ServiceError> for ActionError {
    fn from(err: ServiceError) -> Self {
        if let ServiceError::Internal(inner) = err {
            return Self::Internal(inner);
        }
        let code = match &err {
            ServiceError::StreamDoesNotExist { .. } => ReplyCode::KoStreamDoesNotExist,
            ServiceError::StreamAlreadyExists { .. } => ReplyCode::KoStreamAlreadyExists,
            ServiceError::UnknownColumn { .. } | ServiceError::ColumnTypeMismatch { .. } => {
                ReplyCode::KoColumnDoesNotExist
            }
            ServiceError::ColumnAlreadyExists { .. } => ReplyCode::KoColumnAlreadyExists,
            ServiceError::MissingColumnType { .. } => ReplyCode::KoParserError,
            ServiceError::Internal(_) => ReplyCode::KoGeneralError,
        };
        Self::validation(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use strata_core::ColumnType;

    use super::*;

    fn code(err: ServiceError) -> Option<ReplyCode> {
        match ActionError::from(err) {
            ActionError::Validation(f) => Some(f.code),
            ActionError::Internal(_) => None,
        }
    }

    #[test]
    fn service_errors_map_to_specific_codes() {
        let stream = "s".to_string();
        let column = "c".to_string();
        assert_eq!(
            code(ServiceError::StreamDoesNotExist { stream: stream.clone() }),
            Some(ReplyCode::KoStreamDoesNotExist)
        );
        assert_eq!(
            code(ServiceError::StreamAlreadyExists { stream: stream.clone() }),
            Some(ReplyCode::KoStreamAlreadyExists)
        );
        assert_eq!(
            code(ServiceError::UnknownColumn {
                stream: stream.clone(),
                column: column.clone()
            }),
            Some(ReplyCode::KoColumnDoesNotExist)
        );
        assert_eq!(
            code(ServiceError::ColumnTypeMismatch {
                stream: stream.clone(),
                column: column.clone(),
                expected: ColumnType::Integer,
                found: "string",
            }),
            Some(ReplyCode::KoColumnDoesNotExist)
        );
        assert_eq!(
            code(ServiceError::ColumnAlreadyExists {
                stream: stream.clone(),
                column: column.clone()
            }),
            Some(ReplyCode::KoColumnAlreadyExists)
        );
        assert_eq!(
            code(ServiceError::MissingColumnType { stream, column }),
            Some(ReplyCode::KoParserError)
        );
    }

    #[test]
    fn internal_service_error_stays_internal() {
        let err = ActionError::from(ServiceError::Internal(anyhow::anyhow!("io")));
        assert!(matches!(&err, ActionError::Internal(e) if e.to_string() == "io"));
    }
}
