//! Strata Core: streaming control messages, reply codes, and stream schemas.

pub mod messages;
pub mod schema;
pub mod types;

pub use messages::{decode_batch, stream_operations, ActionReply, ReplyCode, StreamingMessage};
pub use schema::{ColumnDef, SchemaViolation, StreamSchema, ValidationResult};
pub use types::{ColumnType, ColumnValue, Value};
