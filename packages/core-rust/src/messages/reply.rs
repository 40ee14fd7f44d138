//! Reply codes and the acknowledgment body sent back for a control message.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome code of a control message.
///
/// Serialized as its integer code so that replies stay readable by clients
/// that only know the numeric table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ReplyCode {
    Ok,
    KoParserError,
    KoStreamAlreadyExists,
    KoStreamDoesNotExist,
    KoGeneralError,
    KoColumnAlreadyExists,
    KoColumnDoesNotExist,
    KoStreamIsNotUserDefined,
    KoStreamOperationNotAllowed,
}

impl ReplyCode {
    /// Numeric wire code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Ok => 1,
            Self::KoParserError => 2,
            Self::KoStreamAlreadyExists => 3,
            Self::KoStreamDoesNotExist => 4,
            Self::KoGeneralError => 7,
            Self::KoColumnAlreadyExists => 8,
            Self::KoColumnDoesNotExist => 9,
            Self::KoStreamIsNotUserDefined => 12,
            Self::KoStreamOperationNotAllowed => 14,
        }
    }

    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl From<ReplyCode> for i32 {
    fn from(code: ReplyCode) -> Self {
        code.code()
    }
}

/// Error for an integer that is not in the reply code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownReplyCode(pub i32);

impl fmt::Display for UnknownReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown reply code {}", self.0)
    }
}

impl std::error::Error for UnknownReplyCode {}

impl TryFrom<i32> for ReplyCode {
    type Error = UnknownReplyCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        let code = match value {
            1 => Self::Ok,
            2 => Self::KoParserError,
            3 => Self::KoStreamAlreadyExists,
            4 => Self::KoStreamDoesNotExist,
            7 => Self::KoGeneralError,
            8 => Self::KoColumnAlreadyExists,
            9 => Self::KoColumnDoesNotExist,
            12 => Self::KoStreamIsNotUserDefined,
            14 => Self::KoStreamOperationNotAllowed,
            other => return Err(UnknownReplyCode(other)),
        };
        Ok(code)
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", self.code())
    }
}

/// Acknowledgment body: a reply code plus optional human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReply {
    pub code: ReplyCode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

impl ActionReply {
    /// Success reply with no detail.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            code: ReplyCode::Ok,
            detail: None,
        }
    }

    #[must_use]
    pub fn new(code: ReplyCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_code_serializes_as_integer() {
        let json = serde_json::to_string(&ActionReply::ok()).unwrap();
        assert_eq!(json, r#"{"code":1}"#);

        let reply = ActionReply::new(ReplyCode::KoStreamDoesNotExist, "missing");
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"code":4,"detail":"missing"}"#);
    }

    #[test]
    fn unknown_integer_is_rejected() {
        let err = serde_json::from_str::<ActionReply>(r#"{"code":99}"#).unwrap_err();
        assert!(err.to_string().contains("unknown reply code 99"));
    }

    #[test]
    fn every_code_survives_the_integer_table() {
        for code in [
            ReplyCode::Ok,
            ReplyCode::KoParserError,
            ReplyCode::KoStreamAlreadyExists,
            ReplyCode::KoStreamDoesNotExist,
            ReplyCode::KoGeneralError,
            ReplyCode::KoColumnAlreadyExists,
            ReplyCode::KoColumnDoesNotExist,
            ReplyCode::KoStreamIsNotUserDefined,
            ReplyCode::KoStreamOperationNotAllowed,
        ] {
            assert_eq!(ReplyCode::try_from(code.code()), Ok(code));
        }
    }
}
