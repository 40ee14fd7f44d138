//! Control message schemas exchanged between clients and the engine.
//!
//! - [`base`]: the [`StreamingMessage`] record and batch decoding
//! - [`reply`]: [`ReplyCode`] and the [`ActionReply`] acknowledgment body
//! - [`stream_operations`]: well-known operation tokens

pub mod base;
pub mod reply;

pub use base::{decode_batch, StreamingMessage};
pub use reply::{ActionReply, ReplyCode, UnknownReplyCode};

/// Operation tokens understood by the engine, grouped by concern.
///
/// Tokens are upper case here; messages are matched case-insensitively.
pub mod stream_operations {
    /// Stream and query definition.
    pub mod definition {
        pub const CREATE: &str = "CREATE";
        pub const DROP: &str = "DROP";
        pub const ALTER: &str = "ALTER";
        pub const ADD_QUERY: &str = "ADD_QUERY";
        pub const REMOVE_QUERY: &str = "REMOVE_QUERY";
    }

    /// Data manipulation.
    pub mod manipulation {
        pub const INSERT: &str = "INSERT";
        pub const LIST: &str = "LIST";
    }

    /// Output actions attached to a stream.
    pub mod action {
        pub const LISTEN: &str = "LISTEN";
        pub const STOP_LISTEN: &str = "STOP_LISTEN";
        pub const INDEX: &str = "INDEX";
        pub const STOP_INDEX: &str = "STOP_INDEX";
    }
}
