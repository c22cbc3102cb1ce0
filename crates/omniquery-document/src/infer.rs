//! Column type inference from sampled values.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::detect::{detect_type, is_date_string, ValueType};

/// Number of values sampled when no limit is given.
pub const DEFAULT_MAX_SAMPLES: usize = 100;

const MAX_SAMPLE_VALUES: usize = 5;

/// Share of non-null samples that must match for `is_likely_*` to hold.
const LIKELY_THRESHOLD: f64 = 0.8;

/// Summary of the values seen in one column or document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferredColumnType {
    /// Most frequent non-null type; [`ValueType::Null`] if every sample was null.
    pub primary_type: ValueType,
    pub has_nulls: bool,
    /// Every non-null type among the samples.
    pub seen_types: BTreeSet<ValueType>,
    /// Up to five non-null values, in sample order.
    pub sample_values: Vec<Value>,
    /// More than 80% of non-null samples are date strings.
    pub is_likely_date: bool,
    /// More than 80% of non-null samples are strings holding JSON objects or arrays.
    pub is_likely_json: bool,
}

/// Infers the type of a column from up to `max_samples` of its values.
///
/// Ties between equally frequent types go to the one seen first.
///
/// ```
/// use omniquery_document::{infer_column_type, ValueType, DEFAULT_MAX_SAMPLES};
/// use serde_json::json;
///
/// let values = [json!(1), json!(2), json!(3), json!(null)];
/// let inferred = infer_column_type(&values, DEFAULT_MAX_SAMPLES);
/// assert_eq!(inferred.primary_type, ValueType::Number);
/// assert!(inferred.has_nulls);
/// assert!(!inferred.is_likely_date);
/// ```
pub fn infer_column_type(values: &[Value], max_samples: usize) -> InferredColumnType {
    let mut tallies: Vec<(ValueType, usize)> = Vec::new();
    let mut has_nulls = false;
    let mut seen_types = BTreeSet::new();
    let mut sample_values = Vec::new();
    let mut non_null = 0usize;
    let mut date_strings = 0usize;
    let mut json_strings = 0usize;

    for value in values.iter().take(max_samples) {
        let value_type = detect_type(value);
        if value_type == ValueType::Null {
            has_nulls = true;
            continue;
        }
        non_null += 1;
        seen_types.insert(value_type);
        match tallies.iter_mut().find(|(t, _)| *t == value_type) {
            Some((_, count)) => *count += 1,
            None => tallies.push((value_type, 1)),
        }
        if sample_values.len() < MAX_SAMPLE_VALUES {
            sample_values.push(value.clone());
        }
        if let Value::String(s) = value {
            if is_date_string(s) {
                date_strings += 1;
            } else if is_json_text(s) {
                json_strings += 1;
            }
        }
    }

    // max_by_key keeps the last maximum; fold keeps the first
    let primary_type = tallies
        .iter()
        .fold(None, |best: Option<(ValueType, usize)>, &(t, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((t, count)),
        })
        .map_or(ValueType::Null, |(t, _)| t);

    InferredColumnType {
        primary_type,
        has_nulls,
        seen_types,
        sample_values,
        is_likely_date: is_likely(date_strings, non_null),
        is_likely_json: is_likely(json_strings, non_null),
    }
}

fn is_likely(matches: usize, total: usize) -> bool {
    total > 0 && matches as f64 / total as f64 > LIKELY_THRESHOLD
}

fn is_json_text(s: &str) -> bool {
    let trimmed = s.trim();
    (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<Value>(trimmed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_with_nulls() {
        let inferred = infer_column_type(&[json!(1), json!(2), json!(3), json!(null)], 100);
        assert_eq!(inferred.primary_type, ValueType::Number);
        assert!(inferred.has_nulls);
        assert!(!inferred.is_likely_date);
        assert!(!inferred.is_likely_json);
        assert_eq!(inferred.sample_values, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn all_null_or_empty() {
        let inferred = infer_column_type(&[json!(null), json!(null)], 100);
        assert_eq!(inferred.primary_type, ValueType::Null);
        assert!(inferred.has_nulls);

        let inferred = infer_column_type(&[], 100);
        assert_eq!(inferred.primary_type, ValueType::Null);
        assert!(!inferred.has_nulls);
        assert!(inferred.sample_values.is_empty());
    }

    #[test]
    fn ties_go_to_first_seen() {
        let inferred = infer_column_type(&[json!("a"), json!(1), json!(2), json!("b")], 100);
        assert_eq!(inferred.primary_type, ValueType::String);
    }

    #[test]
    fn mixed_columns_report_every_type() {
        let inferred = infer_column_type(&[json!(1), json!("x"), json!(null), json!(2)], 100);
        assert_eq!(inferred.primary_type, ValueType::Number);
        assert_eq!(
            inferred.seen_types.into_iter().collect::<Vec<_>>(),
            [ValueType::String, ValueType::Number]
        );

        let wire = serde_json::to_value(infer_column_type(&[json!(true)], 100)).unwrap();
        assert_eq!(wire["seenTypes"], json!(["boolean"]));
        assert!(infer_column_type(&[json!(null)], 100).seen_types.is_empty());
    }

    #[test]
    fn sampling_limit() {
        let values = [json!(true), json!(1), json!(2), json!(3)];
        let inferred = infer_column_type(&values, 1);
        assert_eq!(inferred.primary_type, ValueType::Boolean);
        assert_eq!(inferred.sample_values.len(), 1);

        let many: Vec<Value> = (0..20).map(|i| json!(i)).collect();
        assert_eq!(infer_column_type(&many, 100).sample_values.len(), 5);
    }

    #[test]
    fn dates_stored_as_strings() {
        let values = [
            json!("2024-01-01"),
            json!("2024-01-02T10:00:00Z"),
            json!("2024-01-03"),
            json!("2024-01-04"),
            json!("2024-01-05"),
        ];
        let inferred = infer_column_type(&values, 100);
        assert_eq!(inferred.primary_type, ValueType::Date);
        assert!(inferred.is_likely_date);

        let mixed = [json!("2024-01-01"), json!("soon"), json!("2024-01-03")];
        assert!(!infer_column_type(&mixed, 100).is_likely_date);
    }

    #[test]
    fn json_stored_as_strings() {
        let values = [json!("{\"a\":1}"), json!("[1,2]"), json!(" {} ")];
        let inferred = infer_column_type(&values, 100);
        assert_eq!(inferred.primary_type, ValueType::String);
        assert!(inferred.is_likely_json);
        assert!(!infer_column_type(&[json!("{broken")], 100).is_likely_json);
    }
}
