//! Filter validation and normalization.
//!
//! Rules run in groups and stop at the first group that produces errors:
//!
//! 1. Structure: id present, column name non-blank, operator tag known
//! 2. Operand: operators that need a value have a non-null, non-blank one
//!    (`equals`/`not_equals` accept a blank string)
//! 3. Second operand: `between` has a `value2`
//! 4. List: `in` has at least one non-blank element
//!
//! On success the condition is normalized: column name and string operands
//! trimmed, `in` operands split into a clean list.

use crate::condition::{FilterCondition, FilterInput};
use crate::error::{Result, ValidationErrors};
use crate::operator::Operator;
use crate::value::{FilterValue, Scalar};

/// Validates a filter draft and returns the normalized condition.
///
/// # Example
///
/// ```
/// use omniquery_filter::{validate_filter, FilterInput, Scalar};
///
/// let draft = FilterInput::new("1", "age", "between", Scalar::from(10i64));
/// let errors = validate_filter(&draft).unwrap_err();
/// assert!(errors.mentions("second value"));
///
/// let fixed = draft.with_value2(20i64);
/// assert!(validate_filter(&fixed).is_ok());
/// ```
pub fn validate_filter(input: &FilterInput) -> Result<FilterCondition> {
    let operator = check_structure(input)?;
    check_operand(input, operator)?;
    check_second_operand(input, operator)?;
    let values = check_list(input, operator)?;
    Ok(normalize(input, operator, values))
}

/// Validates several drafts, separating accepted conditions from rejected ids.
pub fn validate_all(
    inputs: &[FilterInput],
) -> (Vec<FilterCondition>, Vec<(String, ValidationErrors)>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for input in inputs {
        match validate_filter(input) {
            Ok(condition) => valid.push(condition),
            Err(errors) => invalid.push((input.id.clone(), errors)),
        }
    }
    (valid, invalid)
}

fn check_structure(input: &FilterInput) -> Result<Operator> {
    let mut errors = Vec::new();
    if input.id.trim().is_empty() {
        errors.push("Filter id is required".to_string());
    }
    if input.column_name.trim().is_empty() {
        errors.push("Column name is required".to_string());
    }
    let operator = input.parsed_operator();
    if operator.is_none() {
        errors.push(format!("Unknown operator '{}'", input.operator));
    }
    match operator {
        Some(op) if errors.is_empty() => Ok(op),
        _ => Err(ValidationErrors(errors)),
    }
}

fn check_operand(input: &FilterInput, operator: Operator) -> Result<()> {
    if !operator.needs_value() {
        return Ok(());
    }
    let mut errors = Vec::new();
    match &input.value {
        FilterValue::None | FilterValue::Single(Scalar::Null) => {
            errors.push(format!("A value is required for the '{}' operator", operator));
        }
        FilterValue::Single(Scalar::String(s)) if s.trim().is_empty() => {
            if !matches!(operator, Operator::Equals | Operator::NotEquals) {
                errors.push(format!("A value is required for the '{}' operator", operator));
            }
        }
        FilterValue::List(_) if operator != Operator::In => {
            errors.push(format!(
                "The '{}' operator expects a single value, not a list",
                operator
            ));
        }
        _ => {}
    }
    ValidationErrors::check(errors)
}

fn check_second_operand(input: &FilterInput, operator: Operator) -> Result<()> {
    if !operator.metadata().needs_two_values {
        return Ok(());
    }
    let missing = match &input.value2 {
        None => true,
        Some(value2) => value2.is_blank(),
    };
    if missing {
        return Err(ValidationErrors(vec![format!(
            "A second value is required for the '{}' operator",
            operator
        )]));
    }
    Ok(())
}

fn check_list(input: &FilterInput, operator: Operator) -> Result<Vec<Scalar>> {
    if !operator.metadata().needs_comma_separated {
        return Ok(Vec::new());
    }
    let values = split_list(&input.value);
    if values.is_empty() {
        return Err(ValidationErrors(vec![format!(
            "At least one value is required for the '{}' operator",
            operator
        )]));
    }
    Ok(values)
}

/// Splits an `in` operand into trimmed, non-blank elements.
///
/// Strings are split on commas; explicit lists are filtered element by
/// element; a single non-string operand becomes a one-element list.
pub fn split_list(value: &FilterValue) -> Vec<Scalar> {
    match value {
        FilterValue::None => Vec::new(),
        FilterValue::Single(Scalar::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Scalar::from)
            .collect(),
        FilterValue::Single(Scalar::Null) => Vec::new(),
        FilterValue::Single(other) => vec![other.clone()],
        FilterValue::List(items) => items
            .iter()
            .filter(|item| !item.is_blank())
            .map(Scalar::trimmed)
            .collect(),
    }
}

fn normalize(input: &FilterInput, operator: Operator, list: Vec<Scalar>) -> FilterCondition {
    let value = if !operator.needs_value() {
        FilterValue::None
    } else if operator == Operator::In {
        FilterValue::List(list)
    } else {
        match &input.value {
            FilterValue::Single(scalar) => FilterValue::Single(scalar.trimmed()),
            other => other.clone(),
        }
    };
    let value2 = if operator == Operator::Between {
        input.value2.as_ref().map(Scalar::trimmed)
    } else {
        None
    };
    FilterCondition {
        id: input.id.clone(),
        column_name: input.column_name.trim().to_string(),
        operator,
        value,
        value2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(op: &str, value: impl Into<FilterValue>) -> FilterInput {
        FilterInput::new("1", "  name ", op, value)
    }

    #[test]
    fn structural_errors_are_reported_together() {
        let draft = FilterInput::new("", " ", "like", Scalar::from("x"));
        let errors = validate_filter(&draft).unwrap_err();
        assert_eq!(errors.messages().len(), 3);
        assert!(errors.mentions("id is required"));
        assert!(errors.mentions("column name"));
        assert!(errors.mentions("unknown operator 'like'"));
    }

    #[test]
    fn structural_group_short_circuits() {
        let draft = FilterInput::new("1", "", "between", FilterValue::None);
        let errors = validate_filter(&draft).unwrap_err();
        assert_eq!(errors.messages(), ["Column name is required"]);
    }

    #[test]
    fn blank_values() {
        assert!(validate_filter(&input("contains", Scalar::from("  "))).is_err());
        assert!(validate_filter(&input("greater_than", FilterValue::None)).is_err());
        assert!(validate_filter(&input("starts_with", Scalar::Null)).is_err());

        let eq = validate_filter(&input("equals", Scalar::from(""))).unwrap();
        assert_eq!(eq.value, FilterValue::Single(Scalar::from("")));
        assert!(validate_filter(&input("not_equals", Scalar::from("  "))).is_ok());
    }

    #[test]
    fn list_for_single_value_operator_is_rejected() {
        let errors =
            validate_filter(&input("equals", FilterValue::list(["a", "b"]))).unwrap_err();
        assert!(errors.mentions("single value"));
    }

    #[test]
    fn between_needs_second_value() {
        let draft = FilterInput::new("1", "age", "between", Scalar::from(10i64));
        let errors = validate_filter(&draft).unwrap_err();
        assert!(errors.mentions("second value"));

        let blank = draft.clone().with_value2(" ");
        assert!(validate_filter(&blank).is_err());

        let ok = validate_filter(&draft.with_value2(20i64)).unwrap();
        assert_eq!(ok.value2, Some(Scalar::from(20i64)));
    }

    #[test]
    fn in_splits_comma_separated_strings() {
        let condition = validate_filter(&input("in", Scalar::from(" a, b ,,c , "))).unwrap();
        assert_eq!(condition.value, FilterValue::list(["a", "b", "c"]));
        assert_eq!(condition.column_name, "name");
    }

    #[test]
    fn in_filters_explicit_lists() {
        let list = FilterValue::List(vec![
            Scalar::from(" x "),
            Scalar::from(""),
            Scalar::Null,
            Scalar::from(3i64),
        ]);
        let condition = validate_filter(&input("in", list)).unwrap();
        assert_eq!(
            condition.value,
            FilterValue::List(vec![Scalar::from("x"), Scalar::from(3i64)])
        );
    }

    #[test]
    fn in_requires_one_element() {
        let errors = validate_filter(&input("in", Scalar::from(" , ,"))).unwrap_err();
        assert!(errors.mentions("at least one value"));
        let errors = validate_filter(&input("in", FilterValue::List(vec![]))).unwrap_err();
        assert!(errors.mentions("at least one value"));
    }

    #[test]
    fn normalization_trims_and_drops_stray_operands() {
        let draft = FilterInput::new("1", " city ", "contains", Scalar::from("  york "))
            .with_value2("ignored");
        let condition = validate_filter(&draft).unwrap();
        assert_eq!(condition.column_name, "city");
        assert_eq!(condition.value, FilterValue::Single(Scalar::from("york")));
        assert_eq!(condition.value2, None);

        let null_check = FilterInput::new("1", "city", "is_null", Scalar::from("junk"));
        let condition = validate_filter(&null_check).unwrap();
        assert_eq!(condition.value, FilterValue::None);
    }

    #[test]
    fn validate_all_partitions() {
        let drafts = vec![
            FilterInput::new("a", "x", "equals", Scalar::from(1i64)),
            FilterInput::new("b", "x", "nope", Scalar::from(1i64)),
        ];
        let (valid, invalid) = validate_all(&drafts);
        assert_eq!(valid.len(), 1);
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].0, "b");
    }
}
