//! Semantic type detection for individual values.

use omniquery_schema::literal::{is_object_id, parse_datetime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Semantic class of a value, finer than its JSON type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    Null,
    String,
    Number,
    Boolean,
    Date,
    ObjectId,
    Array,
    Object,
    Binary,
}

impl ValueType {
    /// Returns the wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::ObjectId => "objectId",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Binary => "binary",
        }
    }

    /// Returns `true` for types that are rendered as a single cell even
    /// though their JSON form is an object.
    pub fn is_atomic(self) -> bool {
        !matches!(self, ValueType::Array | ValueType::Object)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static DATE_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})?)?$")
        .expect("valid date pattern")
});

/// Classifies a value.
///
/// Strings that are 24 hex characters are object ids; strings shaped like a
/// date that also parse to a real calendar date are dates. Objects are
/// checked for the extended JSON wrappers `{"$oid"}`, `{"$date"}`,
/// `{"$binary"}` and for serialized buffers `{"type": "Buffer", "data": [..]}`.
///
/// ```
/// use omniquery_document::{detect_type, ValueType};
/// use serde_json::json;
///
/// assert_eq!(detect_type(&json!("507f1f77bcf86cd799439011")), ValueType::ObjectId);
/// assert_eq!(detect_type(&json!("2024-02-29")), ValueType::Date);
/// assert_eq!(detect_type(&json!("2023-02-29")), ValueType::String);
/// assert_eq!(detect_type(&json!({"$date": "2024-01-01T00:00:00Z"})), ValueType::Date);
/// ```
pub fn detect_type(value: &Value) -> ValueType {
    match value {
        Value::Null => ValueType::Null,
        Value::Bool(_) => ValueType::Boolean,
        Value::Number(_) => ValueType::Number,
        Value::String(s) => detect_string(s),
        Value::Array(_) => ValueType::Array,
        Value::Object(map) => detect_object(map),
    }
}

fn detect_string(s: &str) -> ValueType {
    if is_object_id(s) {
        ValueType::ObjectId
    } else if is_date_string(s) {
        ValueType::Date
    } else {
        ValueType::String
    }
}

fn detect_object(map: &Map<String, Value>) -> ValueType {
    if map.contains_key("$oid") {
        return ValueType::ObjectId;
    }
    if map.contains_key("$date") {
        return ValueType::Date;
    }
    if map.contains_key("$binary") || is_buffer(map) {
        return ValueType::Binary;
    }
    ValueType::Object
}

fn is_buffer(map: &Map<String, Value>) -> bool {
    map.get("type").and_then(Value::as_str) == Some("Buffer")
        && map.get("data").is_some_and(Value::is_array)
}

/// Returns `true` if `s` looks like a date and parses to a real one.
pub(crate) fn is_date_string(s: &str) -> bool {
    DATE_LIKE.is_match(s) && parse_datetime(s).is_some()
}
