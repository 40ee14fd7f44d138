use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ColumnType, ColumnValue, Value};

/// Definition of a stream: its name, ordered columns, and whether it was
/// created by a user or is an engine-internal stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSchema {
    /// Name of the stream.
    pub name: String,
    /// Column definitions in declaration order.
    pub columns: Vec<ColumnDef>,
    /// `false` for streams the engine owns (e.g. statistics streams).
    pub user_defined: bool,
}

/// Single column definition within a stream schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Name of the column.
    pub name: String,
    /// Declared type of the column.
    pub column_type: ColumnType,
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A single way a payload can disagree with a stream schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    /// The payload names a column the stream does not declare.
    UnknownColumn { column: String },
    /// The payload value does not fit the declared column type.
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: &'static str,
    },
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn { column } => write!(f, "column {column} does not exist"),
            Self::TypeMismatch {
                column,
                expected,
                found,
            } => write!(f, "column {column} expects {expected}, found {found}"),
        }
    }
}

/// Result of validating a payload against a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// The payload conforms to the schema.
    Valid,
    /// The payload violates one or more schema constraints.
    Invalid {
        /// Every violation found, in payload order.
        errors: Vec<SchemaViolation>,
    },
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl StreamSchema {
    /// Builds a user-defined schema.
    #[must_use]
    pub fn user(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
            user_defined: true,
        }
    }

    /// Builds an engine-internal schema.
    #[must_use]
    pub fn internal(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
            user_defined: false,
        }
    }

    /// Looks up a column by name. Column names are case-sensitive.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Checks a data payload against the declared columns.
    ///
    /// Columns absent from the payload are allowed; the stream fills them
    /// with nulls.
    #[must_use]
    pub fn check_columns(&self, payload: &[ColumnValue]) -> ValidationResult {
        let errors: Vec<SchemaViolation> = payload
            .iter()
            .filter_map(|cv| match self.column(&cv.column) {
                None => Some(SchemaViolation::UnknownColumn {
                    column: cv.column.clone(),
                }),
                Some(def) if !def.column_type.accepts(&cv.value) => {
                    Some(SchemaViolation::TypeMismatch {
                        column: cv.column.clone(),
                        expected: def.column_type,
                        found: found_kind(def.column_type, &cv.value),
                    })
                }
                Some(_) => None,
            })
            .collect();

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { errors }
        }
    }
}

/// Kind reported for a rejected value. An integer rejected by an integer
/// column can only be out of the 32-bit range.
fn found_kind(expected: ColumnType, value: &Value) -> &'static str {
    match (expected, value) {
        (ColumnType::Integer, Value::Int(_)) => "64-bit integer",
        _ => value.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensors() -> StreamSchema {
        StreamSchema::user(
            "sensors",
            vec![
                ColumnDef::new("id", ColumnType::String),
                ColumnDef::new("temp", ColumnType::Double),
            ],
        )
    }

    #[test]
    fn partial_payload_is_valid() {
        let result = sensors().check_columns(&[ColumnValue::new("temp", 20)]);
        assert!(result.is_valid());
    }

    #[test]
    fn unknown_column_is_reported() {
        let result = sensors().check_columns(&[ColumnValue::new("humidity", 40)]);
        assert_eq!(
            result,
            ValidationResult::Invalid {
                errors: vec![SchemaViolation::UnknownColumn {
                    column: "humidity".to_string()
                }]
            }
        );
    }

    #[test]
    fn every_violation_is_collected_in_payload_order() {
        let result = sensors().check_columns(&[
            ColumnValue::new("id", 5),
            ColumnValue::new("pressure", 1.0),
        ]);
        let ValidationResult::Invalid { errors } = result else {
            panic!("expected invalid payload");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "column id expects STRING, found integer");
        assert_eq!(errors[1].to_string(), "column pressure does not exist");
    }

    #[test]
    fn out_of_range_integer_names_its_width() {
        let schema = StreamSchema::user("counts", vec![ColumnDef::new("n", ColumnType::Integer)]);
        let ValidationResult::Invalid { errors } =
            schema.check_columns(&[ColumnValue::new("n", i64::from(i32::MAX) + 1)])
        else {
            panic!("expected invalid payload");
        };
        assert_eq!(errors[0].to_string(), "column n expects INTEGER, found 64-bit integer");
    }

    #[test]
    fn column_lookup_is_case_sensitive() {
        assert!(sensors().column("ID").is_none());
        assert!(sensors().column("id").is_some());
    }

    proptest::proptest! {
        #[test]
        fn nulls_in_declared_columns_are_always_valid(picks in proptest::collection::vec(0usize..2, 0..8)) {
            let schema = sensors();
            let payload: Vec<ColumnValue> = picks
                .iter()
                .map(|&i| ColumnValue::new(schema.columns[i].name.clone(), crate::types::Value::Null))
                .collect();
            proptest::prop_assert!(schema.check_columns(&payload).is_valid());
        }
    }
}
