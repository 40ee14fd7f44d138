//! In-memory [`StreamOperationService`] implementation.
//!
//! Holds stream schemas and accepted events in a [`DashMap`]. Internal
//! (engine-owned) streams are registered up front from [`EngineConfig`] and
//! only admit the configured allow-list of operations.

use std::collections::HashSet;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use strata_core::{ColumnDef, ColumnValue, SchemaViolation, StreamSchema, ValidationResult};
use tracing::debug;

use crate::service::config::EngineConfig;
use crate::traits::{ServiceError, StreamOperationService};

struct StreamState {
    schema: StreamSchema,
    events: Vec<Vec<ColumnValue>>,
}

/// Stream registry and event log kept entirely in memory.
pub struct InMemoryStreamService {
    streams: DashMap<String, StreamState>,
    internal_operations: Vec<String>,
}

impl InMemoryStreamService {
    /// Creates an empty service with no internal streams.
    #[must_use]
    pub fn new() -> Self {
        Self {
            streams: DashMap::new(),
            internal_operations: Vec::new(),
        }
    }

    /// Creates a service with the internal streams named in `config`.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        let service = Self {
            streams: DashMap::new(),
            internal_operations: config.internal_stream_operations.clone(),
        };
        for name in &config.internal_streams {
            service.register_internal(StreamSchema::internal(name.clone(), Vec::new()));
        }
        service
    }

    /// Registers an engine-owned stream, replacing any stream of that name.
    pub fn register_internal(&self, schema: StreamSchema) {
        let name = schema.name.clone();
        self.streams.insert(
            name,
            StreamState {
                schema: StreamSchema {
                    user_defined: false,
                    ..schema
                },
                events: Vec::new(),
            },
        );
    }

    /// Schema of a stream, if it exists.
    #[must_use]
    pub fn schema(&self, stream: &str) -> Option<StreamSchema> {
        self.streams.get(stream).map(|s| s.schema.clone())
    }

    /// Events accepted by `send` for a stream, oldest first.
    #[must_use]
    pub fn events(&self, stream: &str) -> Vec<Vec<ColumnValue>> {
        self.streams
            .get(stream)
            .map(|s| s.events.clone())
            .unwrap_or_default()
    }

    /// Names of all known streams, sorted.
    #[must_use]
    pub fn stream_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.streams.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl Default for InMemoryStreamService {
    fn default() -> Self {
        Self::new()
    }
}

fn violation_to_error(stream: &str, violation: SchemaViolation) -> ServiceError {
    match violation {
        SchemaViolation::UnknownColumn { column } => ServiceError::UnknownColumn {
            stream: stream.to_string(),
            column,
        },
        SchemaViolation::TypeMismatch {
            column,
            expected,
            found,
        } => ServiceError::ColumnTypeMismatch {
            stream: stream.to_string(),
            column,
            expected,
            found,
        },
    }
}

impl StreamOperationService for InMemoryStreamService {
    fn stream_exists(&self, stream: &str) -> bool {
        self.streams.contains_key(stream)
    }

    fn is_user_defined(&self, stream: &str) -> bool {
        self.streams
            .get(stream)
            .is_some_and(|s| s.schema.user_defined)
    }

    fn is_operation_allowed(&self, stream: &str, operation: &str) -> bool {
        match self.streams.get(stream) {
            Some(state) if !state.schema.user_defined => self
                .internal_operations
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(operation)),
            _ => true,
        }
    }

    fn create_stream(&self, stream: &str, columns: &[ColumnValue]) -> Result<(), ServiceError> {
        let defs = columns
            .iter()
            .map(|cv| {
                cv.column_type
                    .map(|ty| ColumnDef::new(cv.column.clone(), ty))
                    .ok_or_else(|| ServiceError::MissingColumnType {
                        stream: stream.to_string(),
                        column: cv.column.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::with_capacity(defs.len());
        if let Some(dup) = defs.iter().find(|def| !seen.insert(def.name.as_str())) {
            return Err(ServiceError::ColumnAlreadyExists {
                stream: stream.to_string(),
                column: dup.name.clone(),
            });
        }

        match self.streams.entry(stream.to_string()) {
            Entry::Occupied(_) => Err(ServiceError::StreamAlreadyExists {
                stream: stream.to_string(),
            }),
            Entry::Vacant(slot) => {
                debug!(stream, columns = defs.len(), "stream created");
                slot.insert(StreamState {
                    schema: StreamSchema::user(stream, defs),
                    events: Vec::new(),
                });
                Ok(())
            }
        }
    }

    fn drop_stream(&self, stream: &str) -> Result<(), ServiceError> {
        if self.streams.remove(stream).is_none() {
            return Err(ServiceError::StreamDoesNotExist {
                stream: stream.to_string(),
            });
        }
        debug!(stream, "stream dropped");
        Ok(())
    }

    fn send(&self, stream: &str, columns: &[ColumnValue]) -> Result<(), ServiceError> {
        let mut state = self
            .streams
            .get_mut(stream)
            .ok_or_else(|| ServiceError::StreamDoesNotExist {
                stream: stream.to_string(),
            })?;

        if let ValidationResult::Invalid { errors } = state.schema.check_columns(columns) {
            // Only the first violation is reported.
            if let Some(first) = errors.into_iter().next() {
                return Err(violation_to_error(stream, first));
            }
        }

        state.events.push(columns.to_vec());
        Ok(())
    }
}
