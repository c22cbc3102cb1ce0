//! Rendering document values as cells and plain JSON.
//!
//! Documents read from some backends carry extended JSON wrappers
//! (`{"$oid": ..}`, `{"$date": ..}`, `{"$numberLong": ..}`). Exports and
//! grids want the plain value instead.

use omniquery_schema::literal::{from_epoch_millis, parse_datetime};
use serde_json::{Map, Number, Value};

pub use omniquery_schema::literal::to_iso8601;

/// Replaces extended JSON wrappers with plain values, recursively.
///
/// - `{"$oid": s}` becomes `s`
/// - `{"$date": ..}` becomes an ISO-8601 string (from text, epoch millis or
///   `{"$numberLong": ..}`); unparseable dates are kept as given
/// - `{"$numberInt"|"$numberLong"|"$numberDouble"|"$numberDecimal": s}`
///   becomes a number when `s` parses
///
/// ```
/// use omniquery_document::normalize_value;
/// use serde_json::json;
///
/// let doc = json!({"_id": {"$oid": "507f1f77bcf86cd799439011"}, "n": {"$numberLong": "7"}});
/// assert_eq!(
///     normalize_value(&doc),
///     json!({"_id": "507f1f77bcf86cd799439011", "n": 7})
/// );
/// ```
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize_value).collect()),
        Value::Object(map) => unwrap_extended(map).unwrap_or_else(|| {
            Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), normalize_value(v)))
                    .collect(),
            )
        }),
        other => other.clone(),
    }
}

fn unwrap_extended(map: &Map<String, Value>) -> Option<Value> {
    if map.len() != 1 {
        return None;
    }
    let (key, inner) = map.iter().next()?;
    match key.as_str() {
        "$oid" => inner.as_str().map(|s| Value::String(s.to_string())),
        "$date" => Some(Value::String(date_text(inner)?)),
        "$numberInt" | "$numberLong" | "$numberDouble" | "$numberDecimal" => number_value(inner),
        _ => None,
    }
}

fn date_text(inner: &Value) -> Option<String> {
    match inner {
        Value::String(s) => Some(parse_datetime(s).map_or_else(|| s.clone(), |d| to_iso8601(&d))),
        Value::Number(n) => n.as_i64().and_then(from_epoch_millis).map(|d| to_iso8601(&d)),
        Value::Object(map) => map
            .get("$numberLong")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(from_epoch_millis)
            .map(|d| to_iso8601(&d)),
        _ => None,
    }
}

fn number_value(inner: &Value) -> Option<Value> {
    match inner {
        Value::Number(_) => Some(inner.clone()),
        Value::String(s) => {
            if let Ok(n) = s.parse::<i64>() {
                return Some(Value::Number(n.into()));
            }
            s.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        _ => None,
    }
}

/// Renders a value as one text cell. Returns `None` for null.
///
/// Objects and arrays are written as compact JSON after extended JSON
/// wrappers are unwrapped, so an `{"$oid": ..}` renders as the bare id.
///
/// ```
/// use omniquery_document::format_cell;
/// use serde_json::json;
///
/// assert_eq!(format_cell(&json!(null)), None);
/// assert_eq!(format_cell(&json!(1.5)).as_deref(), Some("1.5"));
/// assert_eq!(format_cell(&json!({"a": [1, 2]})).as_deref(), Some(r#"{"a":[1,2]}"#));
/// ```
pub fn format_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => match normalize_value(value) {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        },
    }
}
