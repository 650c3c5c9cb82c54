//! Field-level type checks for raw JSON input.

use crate::error::{ModelError, ModelResult};
use serde_json::Value;

/// JSON value kinds a field may be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl JsonKind {
    /// Whether `value` is an instance of this kind.
    ///
    /// Integers are numbers too, so `Number` accepts both.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Name of the kind `value` actually has.
    pub fn describe(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_f64() => "number",
            Value::Number(_) => "integer",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Check that a field holds one of the `expected` kinds.
///
/// `null` counts as absent. An absent optional field passes.
pub fn check_field(
    name: &str,
    value: Option<&Value>,
    expected: &[JsonKind],
    required: bool,
) -> ModelResult<()> {
    match value {
        None | Some(Value::Null) if required => Err(ModelError::MissingRequired {
            field: name.to_string(),
        }),
        None | Some(Value::Null) => Ok(()),
        Some(value) if expected.iter().any(|kind| kind.matches(value)) => Ok(()),
        Some(value) => Err(ModelError::TypeMismatch {
            field: name.to_string(),
            expected: expected
                .iter()
                .map(|kind| kind.name())
                .collect::<Vec<_>>()
                .join(" or "),
            found: JsonKind::describe(value),
        }),
    }
}

/// Look up `key` in `object`, treating `null` as absent.
pub(crate) fn present<'a>(object: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}
