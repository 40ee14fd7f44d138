//! Record types for the coordination store.
//!
//! Defines the stored [`Node`] with its [`NodeMetadata`], and the
//! [`AckRecord`] document serialized into acknowledgment nodes.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use strata_core::{ActionReply, ReplyCode, StreamingMessage};

/// Metadata tracked for every node in the [`CoordinationStore`](super::CoordinationStore).
///
/// Store-internal -- NOT part of the node payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMetadata {
    /// Node version, incremented on every overwrite.
    pub version: u32,
    /// Wall-clock time (millis since epoch) when this node was created.
    pub creation_time: i64,
    /// Wall-clock time of the last write.
    pub last_update_time: i64,
}

impl NodeMetadata {
    /// Creates new metadata at version 1 with both timestamps set to `now`.
    #[must_use]
    pub fn new(now: i64) -> Self {
        Self {
            version: 1,
            creation_time: now,
            last_update_time: now,
        }
    }

    /// Records an overwrite: increments `version` and updates `last_update_time`.
    pub fn on_update(&mut self, now: i64) {
        self.version = self.version.saturating_add(1);
        self.last_update_time = now;
    }
}

/// A stored node: opaque payload bytes plus metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub data: Vec<u8>,
    pub metadata: NodeMetadata,
}

/// JSON document written for every delivered acknowledgment.
///
/// Carries the reply together with the identifiers of the message it
/// answers, so a client can correlate it without knowing the store path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckRecord {
    pub session_id: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
    #[serde(rename = "streamName", skip_serializing_if = "Option::is_none", default)]
    pub stream_name: Option<String>,
    pub code: ReplyCode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
    /// Millis since epoch at which the engine produced the reply.
    pub timestamp: i64,
}

impl AckRecord {
    #[must_use]
    pub fn new(message: &StreamingMessage, reply: &ActionReply, now: i64) -> Self {
        Self {
            session_id: message.session_id.clone(),
            request_id: message.request_id.clone(),
            operation: message.operation.clone(),
            stream_name: message.stream_name.clone(),
            code: reply.code,
            detail: reply.detail.clone(),
            timestamp: now,
        }
    }

    /// The reply part of the record.
    #[must_use]
    pub fn reply(&self) -> ActionReply {
        ActionReply {
            code: self.code,
            detail: self.detail.clone(),
        }
    }
}

/// Current wall-clock time in millis since epoch. Clocks before the epoch read as 0.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_new_starts_at_version_one() {
        let meta = NodeMetadata::new(1000);
        assert_eq!(meta.version, 1);
        assert_eq!(meta.creation_time, 1000);
        assert_eq!(meta.last_update_time, 1000);
    }

    #[test]
    fn metadata_on_update_keeps_creation_time() {
        let mut meta = NodeMetadata::new(1000);
        meta.on_update(2000);
        assert_eq!(meta.version, 2);
        assert_eq!(meta.creation_time, 1000);
        assert_eq!(meta.last_update_time, 2000);
    }

    #[test]
    fn ack_record_carries_message_identifiers() {
        let msg = StreamingMessage::new("create", "sensors").with_ids("s-1", "r-9");
        let reply = ActionReply::new(ReplyCode::KoStreamAlreadyExists, "stream sensors already exists");
        let record = AckRecord::new(&msg, &reply, 42);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["session_id"], "s-1");
        assert_eq!(json["request_id"], "r-9");
        assert_eq!(json["streamName"], "sensors");
        assert_eq!(json["code"], 3);
        assert_eq!(json["timestamp"], 42);
        assert_eq!(record.reply(), reply);
    }

    #[test]
    fn success_record_omits_detail() {
        let msg = StreamingMessage::new("drop", "sensors").with_ids("s", "r");
        let json = serde_json::to_value(AckRecord::new(&msg, &ActionReply::ok(), 0)).unwrap();
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn now_millis_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
