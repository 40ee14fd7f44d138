//! The control message addressed to the streaming engine.
//!
//! Field names follow the established wire format: `streamName` is camelCase
//! while `session_id` and `request_id` are snake case.

use serde::{Deserialize, Serialize};

use crate::types::ColumnValue;

/// A single control-plane record: a target stream, an operation name, an
/// ordered payload of column values, and the identifiers used to correlate
/// the reply.
///
/// Note: `Default` produces empty identifiers -- for test convenience only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamingMessage {
    /// Operation token, matched case-insensitively against command names.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
    #[serde(rename = "streamName", skip_serializing_if = "Option::is_none", default)]
    pub stream_name: Option<String>,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub request_id: String,
    /// Raw request text as typed by the client, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request: Option<String>,
    /// Client-side creation time in millis since epoch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub columns: Vec<ColumnValue>,
}

impl StreamingMessage {
    /// Creates a message for `operation` on `stream_name` with an empty payload.
    #[must_use]
    pub fn new(operation: impl Into<String>, stream_name: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            stream_name: Some(stream_name.into()),
            ..Self::default()
        }
    }

    /// Sets the session and request identifiers.
    #[must_use]
    pub fn with_ids(mut self, session_id: impl Into<String>, request_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<ColumnValue>) -> Self {
        self.columns = columns;
        self
    }

    /// The operation token, treating an empty string as absent.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref().filter(|op| !op.is_empty())
    }

    /// The stream name, treating an empty string as absent.
    #[must_use]
    pub fn stream_name(&self) -> Option<&str> {
        self.stream_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Parses a JSON array of messages.
///
/// # Errors
///
/// Returns the `serde_json` error when the input is not a JSON array of
/// messages.
pub fn decode_batch(bytes: &[u8]) -> Result<Vec<StreamingMessage>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn wire_names_match_client_format() {
        let msg = StreamingMessage::new("INSERT", "sensors")
            .with_ids("sess-1", "req-1")
            .with_columns(vec![ColumnValue::new("temp", 21.5)]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["streamName"], "sensors");
        assert_eq!(json["session_id"], "sess-1");
        assert_eq!(json["request_id"], "req-1");
        assert_eq!(json["columns"][0]["column"], "temp");
        assert!(json.get("request").is_none());
    }

    #[test]
    fn missing_fields_default() {
        let msg: StreamingMessage = serde_json::from_str(r#"{"operation":"drop"}"#).unwrap();
        assert_eq!(msg.operation(), Some("drop"));
        assert!(msg.stream_name().is_none());
        assert!(msg.columns.is_empty());
        assert_eq!(msg.session_id, "");
    }

    #[test]
    fn empty_tokens_read_as_absent() {
        let msg = StreamingMessage::new("", "");
        assert!(msg.operation().is_none());
        assert!(msg.stream_name().is_none());
    }

    #[test]
    fn decode_batch_keeps_order() {
        let batch = decode_batch(
            br#"[
                {"operation":"create","streamName":"a","session_id":"s","request_id":"1"},
                {"operation":"insert","streamName":"a","session_id":"s","request_id":"2",
                 "columns":[{"column":"x","value":1}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].request_id, "1");
        assert_eq!(batch[1].columns[0].value, Value::Int(1));
    }

    #[test]
    fn decode_batch_rejects_non_array() {
        assert!(decode_batch(br#"{"operation":"create"}"#).is_err());
    }
}
