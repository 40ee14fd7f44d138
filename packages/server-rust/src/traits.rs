use strata_core::ColumnValue;

/// Errors reported by a [`StreamOperationService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("stream {stream} does not exist")]
    StreamDoesNotExist { stream: String },
    #[error("stream {stream} already exists")]
    StreamAlreadyExists { stream: String },
    #[error("stream {stream} has no column {column}")]
    UnknownColumn { stream: String, column: String },
    #[error("column {column} of stream {stream} expects {expected}, found {found}")]
    ColumnTypeMismatch {
        stream: String,
        column: String,
        expected: strata_core::ColumnType,
        found: &'static str,
    },
    #[error("column {column} is declared more than once for stream {stream}")]
    ColumnAlreadyExists { stream: String, column: String },
    #[error("column {column} of stream {stream} has no declared type")]
    MissingColumnType { stream: String, column: String },
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Live stream state consulted by validators and mutated by actions.
///
/// All calls are synchronous. Implementations shared between concurrently
/// running processors are responsible for their own synchronization.
pub trait StreamOperationService: Send + Sync {
    /// Whether a stream with this name currently exists.
    fn stream_exists(&self, stream: &str) -> bool;

    /// Whether the stream was created by a user. Unknown streams are not
    /// user defined.
    fn is_user_defined(&self, stream: &str) -> bool;

    /// Whether `operation` may currently be applied to `stream`.
    ///
    /// Streams that do not exist admit every operation; existence is checked
    /// separately by the processors that need it.
    fn is_operation_allowed(&self, stream: &str, operation: &str) -> bool;

    /// Define a new user stream from typed column definitions.
    ///
    /// # Errors
    ///
    /// `StreamAlreadyExists` if the name is taken, `MissingColumnType` if a
    /// column carries no type, `ColumnAlreadyExists` if a column name repeats.
    fn create_stream(&self, stream: &str, columns: &[ColumnValue]) -> Result<(), ServiceError>;

    /// Remove a stream and its data.
    ///
    /// # Errors
    ///
    /// `StreamDoesNotExist` if there is no such stream.
    fn drop_stream(&self, stream: &str) -> Result<(), ServiceError>;

    /// Submit one event to a stream.
    ///
    /// # Errors
    ///
    /// `StreamDoesNotExist`, `UnknownColumn` or `ColumnTypeMismatch` when the
    /// payload does not fit the stream.
    fn send(&self, stream: &str, columns: &[ColumnValue]) -> Result<(), ServiceError>;
}
