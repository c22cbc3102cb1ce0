//! Filter operand values.
//!
//! The UI sends loosely-typed operands (strings, numbers, booleans, arrays,
//! nested objects). They are modeled as the closed sum type [`Scalar`] so
//! every compiler has to handle every variant explicitly.

use chrono::{DateTime, Utc};
use omniquery_schema::literal::{parse_datetime, to_iso8601};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A single filter operand.
///
/// Converts losslessly to and from JSON for the variants JSON can carry.
/// Dates travel as extended JSON `{"$date": "<iso>"}`.
///
/// # Example
///
/// ```
/// use omniquery_filter::{Number, Scalar};
///
/// let age = Scalar::from(42i64);
/// assert_eq!(age, Scalar::Number(Number::I64(42)));
/// assert_eq!(Scalar::from("  ").is_blank(), true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Json", into = "Json")]
pub enum Scalar {
    /// Explicit null.
    Null,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Timestamp in UTC.
    Date(DateTime<Utc>),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Any other JSON structure (objects, arrays used as a single operand).
    Nested(Json),
}

impl Scalar {
    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Returns `true` for null values and strings that are empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a copy with surrounding whitespace removed from string values.
    pub fn trimmed(&self) -> Scalar {
        match self {
            Scalar::String(s) => Scalar::String(s.trim().to_string()),
            other => other.clone(),
        }
    }

    /// Renders the value as plain text, as used inside `LIKE` or regex patterns.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::String(s) => s.clone(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Date(d) => to_iso8601(d),
            Scalar::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Scalar::Nested(json) => json.to_string(),
        }
    }

    /// Parses a numeric string into a number. Non-strings return `None`.
    pub fn parse_number(&self) -> Option<Number> {
        let text = self.as_str()?.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::U64(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::F64)
    }

    /// Parses a boolean-looking string (`true`, `false`, `1`, `0`, `yes`, `no`).
    pub fn parse_bool(&self) -> Option<bool> {
        match self.as_str()?.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        }
    }

    /// Parses a date-looking string into a timestamp.
    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        self.as_str().and_then(parse_datetime)
    }

    /// Converts to JSON. Non-finite numbers become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Scalar::Null => Json::Null,
            Scalar::String(s) => Json::String(s.clone()),
            Scalar::Number(n) => n.to_json(),
            Scalar::Bool(b) => Json::Bool(*b),
            Scalar::Date(d) => serde_json::json!({ "$date": to_iso8601(d) }),
            Scalar::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
            Scalar::Nested(json) => json.clone(),
        }
    }
}

impl From<Json> for Scalar {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Scalar::Null,
            Json::Bool(b) => Scalar::Bool(b),
            Json::Number(n) => Scalar::Number(Number::from_json(&n)),
            Json::String(s) => Scalar::String(s),
            Json::Object(map) => {
                let date = match (map.len(), map.get("$date")) {
                    (1, Some(Json::String(text))) => parse_datetime(text),
                    _ => None,
                };
                match date {
                    Some(date) => Scalar::Date(date),
                    None => Scalar::Nested(Json::Object(map)),
                }
            }
            other => Scalar::Nested(other),
        }
    }
}

impl From<Scalar> for Json {
    fn from(scalar: Scalar) -> Self {
        scalar.to_json()
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(Number::I64(n))
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(Number::I64(n as i64))
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        Scalar::Number(Number::U64(n))
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(Number::F64(n))
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(d: DateTime<Utc>) -> Self {
        Scalar::Date(d)
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Returns `false` for NaN and infinities.
    pub fn is_finite(self) -> bool {
        match self {
            Number::F64(n) => n.is_finite(),
            _ => true,
        }
    }

    /// Converts a JSON number, preferring integer representations.
    pub fn from_json(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }

    /// Converts to a JSON number; non-finite floats become `null`.
    pub fn to_json(self) -> Json {
        match self {
            Number::I64(n) => Json::from(n),
            Number::U64(n) => Json::from(n),
            Number::F64(n) => serde_json::Number::from_f64(n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

/// The operand slot of a filter condition.
///
/// On the wire: `null` or absent is [`FilterValue::None`], an array is
/// [`FilterValue::List`], anything else is [`FilterValue::Single`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Json", into = "Json")]
pub enum FilterValue {
    /// No operand (null-check operators).
    #[default]
    None,
    /// One operand.
    Single(Scalar),
    /// Several operands (the `in` operator).
    List(Vec<Scalar>),
}

impl FilterValue {
    /// Returns the single operand, if this is `Single`.
    pub fn as_single(&self) -> Option<&Scalar> {
        match self {
            FilterValue::Single(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the operand list, if this is `List`.
    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            FilterValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` if there is no operand, or the operand is null.
    pub fn is_missing(&self) -> bool {
        match self {
            FilterValue::None => true,
            FilterValue::Single(s) => s.is_null(),
            FilterValue::List(_) => false,
        }
    }
}

impl From<Json> for FilterValue {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => FilterValue::None,
            Json::Array(items) => FilterValue::List(items.into_iter().map(Scalar::from).collect()),
            other => FilterValue::Single(Scalar::from(other)),
        }
    }
}

impl From<FilterValue> for Json {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::None => Json::Null,
            FilterValue::Single(s) => s.to_json(),
            FilterValue::List(items) => Json::Array(items.iter().map(Scalar::to_json).collect()),
        }
    }
}

impl From<Scalar> for FilterValue {
    fn from(value: Scalar) -> Self {
        FilterValue::Single(value)
    }
}

impl From<Vec<Scalar>> for FilterValue {
    fn from(values: Vec<Scalar>) -> Self {
        FilterValue::List(values)
    }
}

impl FilterValue {
    /// Builds a single-operand value.
    pub fn single(value: impl Into<Scalar>) -> Self {
        FilterValue::Single(value.into())
    }

    /// Builds an operand list.
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}
