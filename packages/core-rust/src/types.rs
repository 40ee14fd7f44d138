use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime value carried by a message column.
///
/// Deserialized untagged so that plain JSON scalars (`null`, `true`, `3`,
/// `2.5`, `"text"`) map directly onto a variant. Variant order matters for
/// untagged decoding: integers are tried before floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer (signed 64-bit).
    Int(i64),
    /// JSON floating-point (64-bit IEEE 754).
    Float(f64),
    /// JSON string (UTF-8).
    String(String),
}

impl Value {
    /// Short name of the value's kind, used in schema violation messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Declared type of a stream column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    String,
    Boolean,
    Integer,
    Long,
    Float,
    Double,
}

impl ColumnType {
    /// Whether a value may be stored in a column of this type.
    ///
    /// `Null` fits every column. `INTEGER` is 32-bit and `LONG` is 64-bit;
    /// integers widen into the floating types.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Integer, Value::Int(v)) => i32::try_from(*v).is_ok(),
            _ => matches!(
                (self, value),
                (_, Value::Null)
                    | (Self::String, Value::String(_))
                    | (Self::Boolean, Value::Bool(_))
                    | (Self::Long | Self::Float | Self::Double, Value::Int(_))
                    | (Self::Float | Self::Double, Value::Float(_))
            ),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
        };
        f.write_str(name)
    }
}

/// One entry of a message payload: a column name, an optional declared type,
/// and a value.
///
/// Definition messages (`CREATE`) carry the type; data messages (`INSERT`)
/// usually only carry the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub column: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub column_type: Option<ColumnType>,
    #[serde(default = "null_value")]
    pub value: Value,
}

fn null_value() -> Value {
    Value::Null
}

impl ColumnValue {
    /// A data column with no declared type.
    #[must_use]
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            column_type: None,
            value: value.into(),
        }
    }

    /// A definition column with a declared type and no value.
    #[must_use]
    pub fn typed(column: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            column: column.into(),
            column_type: Some(column_type),
            value: Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_values_decode_from_plain_json() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 3, 2.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(3),
                Value::Float(2.5),
                Value::String("x".to_string()),
            ]
        );
    }

    #[test]
    fn integers_widen_into_floating_columns() {
        assert!(ColumnType::Double.accepts(&Value::Int(1)));
        assert!(ColumnType::Float.accepts(&Value::Int(1)));
        assert!(!ColumnType::Integer.accepts(&Value::Float(1.5)));
    }

    #[test]
    fn integer_columns_are_32_bit_and_long_columns_64_bit() {
        let max = i64::from(i32::MAX);
        let min = i64::from(i32::MIN);
        assert!(ColumnType::Integer.accepts(&Value::Int(max)));
        assert!(ColumnType::Integer.accepts(&Value::Int(min)));
        assert!(!ColumnType::Integer.accepts(&Value::Int(max + 1)));
        assert!(!ColumnType::Integer.accepts(&Value::Int(min - 1)));
        assert!(ColumnType::Long.accepts(&Value::Int(i64::MAX)));
    }

    #[test]
    fn null_fits_every_column_type() {
        for ty in [
            ColumnType::String,
            ColumnType::Boolean,
            ColumnType::Integer,
            ColumnType::Long,
            ColumnType::Float,
            ColumnType::Double,
        ] {
            assert!(ty.accepts(&Value::Null), "{ty} should accept null");
        }
    }

    #[test]
    fn string_column_rejects_numbers() {
        assert!(!ColumnType::String.accepts(&Value::Int(7)));
        assert!(!ColumnType::Boolean.accepts(&Value::String("true".into())));
    }

    #[test]
    fn column_value_type_uses_wire_name() {
        let col: ColumnValue =
            serde_json::from_str(r#"{"column":"temp","type":"DOUBLE"}"#).unwrap();
        assert_eq!(col.column_type, Some(ColumnType::Double));
        assert_eq!(col.value, Value::Null);

        let json = serde_json::to_value(ColumnValue::new("temp", 21.5)).unwrap();
        assert!(json.get("type").is_none());
        assert_eq!(json["value"], 21.5);
    }
}
