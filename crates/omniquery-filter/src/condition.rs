//! Filter conditions.
//!
//! A [`FilterInput`] is what the UI holds while the user edits a filter chip:
//! the operator is still a raw tag and the operands may be blank. Once
//! [`validate_filter`](crate::validate_filter) accepts it, it becomes a typed
//! [`FilterCondition`] that the compilers consume.

use serde::{Deserialize, Serialize};

use crate::ids::IdGenerator;
use crate::operator::Operator;
use crate::value::{FilterValue, Scalar};

/// A filter as edited in the UI, before validation.
///
/// # Example
///
/// ```
/// use omniquery_filter::{FilterInput, FilterValue};
///
/// let input: FilterInput = serde_json::from_str(
///     r#"{"id":"1","columnName":"age","operator":"between","value":10,"value2":20}"#,
/// ).unwrap();
/// assert_eq!(input.operator, "between");
/// assert_eq!(input.value, FilterValue::single(10i64));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInput {
    /// Opaque identifier of the filter chip.
    #[serde(default)]
    pub id: String,
    /// Column or document field the filter applies to.
    #[serde(default)]
    pub column_name: String,
    /// Operator tag, e.g. `greater_than`.
    #[serde(default)]
    pub operator: String,
    /// First operand (or the list / comma-separated string for `in`).
    #[serde(default)]
    pub value: FilterValue,
    /// Second operand, used by `between`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Scalar>,
}

impl FilterInput {
    /// Creates an input with a single operand.
    pub fn new(
        id: impl Into<String>,
        column_name: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        FilterInput {
            id: id.into(),
            column_name: column_name.into(),
            operator: operator.into(),
            value: value.into(),
            value2: None,
        }
    }

    /// Sets the second operand.
    pub fn with_value2(mut self, value2: impl Into<Scalar>) -> Self {
        self.value2 = Some(value2.into());
        self
    }

    /// Returns the parsed operator, if the tag is known.
    pub fn parsed_operator(&self) -> Option<Operator> {
        Operator::from_tag(self.operator.trim())
    }
}

/// A validated, normalized filter condition.
///
/// Invariants established by validation:
/// - `column_name` is non-empty and trimmed
/// - `value` is [`FilterValue::List`] iff `operator` is [`Operator::In`]
/// - `value` is [`FilterValue::None`] iff the operator needs no value
/// - `value2` is present iff `operator` is [`Operator::Between`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub id: String,
    pub column_name: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: FilterValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Scalar>,
}

impl FilterCondition {
    /// Creates a single-operand condition.
    ///
    /// No validation happens here; use it for conditions built in code.
    pub fn new(
        id: impl Into<String>,
        column_name: impl Into<String>,
        operator: Operator,
        value: impl Into<Scalar>,
    ) -> Self {
        FilterCondition {
            id: id.into(),
            column_name: column_name.into(),
            operator,
            value: FilterValue::Single(value.into()),
            value2: None,
        }
    }

    /// Creates a `between` condition.
    pub fn between(
        id: impl Into<String>,
        column_name: impl Into<String>,
        low: impl Into<Scalar>,
        high: impl Into<Scalar>,
    ) -> Self {
        FilterCondition {
            id: id.into(),
            column_name: column_name.into(),
            operator: Operator::Between,
            value: FilterValue::Single(low.into()),
            value2: Some(high.into()),
        }
    }

    /// Creates an `in` condition.
    pub fn in_list<I, T>(id: impl Into<String>, column_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        FilterCondition {
            id: id.into(),
            column_name: column_name.into(),
            operator: Operator::In,
            value: FilterValue::list(values),
            value2: None,
        }
    }

    /// Creates an operand-less condition (`is_null`, `is_not_null`).
    pub fn null_check(id: impl Into<String>, column_name: impl Into<String>, operator: Operator) -> Self {
        FilterCondition {
            id: id.into(),
            column_name: column_name.into(),
            operator,
            value: FilterValue::None,
            value2: None,
        }
    }
}

/// Creates a fresh filter draft for `column`.
///
/// The draft has a generated id and an empty string value, which is the
/// canonical "new filter" state in the UI.
///
/// ```
/// use omniquery_filter::{create_filter, is_filter_empty, SequentialIds};
///
/// let mut ids = SequentialIds::default();
/// let draft = create_filter("email", None, &mut ids);
/// assert_eq!(draft.id, "filter_1");
/// assert_eq!(draft.operator, "equals");
/// assert!(is_filter_empty(&draft));
/// ```
pub fn create_filter(
    column: impl Into<String>,
    operator: Option<Operator>,
    ids: &mut impl IdGenerator,
) -> FilterInput {
    FilterInput {
        id: ids.next_id(),
        column_name: column.into(),
        operator: operator.unwrap_or(Operator::Equals).as_str().to_string(),
        value: FilterValue::Single(Scalar::String(String::new())),
        value2: None,
    }
}

/// Returns `true` if the filter has no operand worth applying yet.
///
/// Operators that need no value are never empty. Otherwise a missing value,
/// a blank string, or an empty list counts as empty.
pub fn is_filter_empty(filter: &FilterInput) -> bool {
    if let Some(op) = filter.parsed_operator() {
        if !op.needs_value() {
            return false;
        }
    }
    match &filter.value {
        FilterValue::None => true,
        FilterValue::Single(scalar) => scalar.is_blank(),
        FilterValue::List(items) => items.is_empty(),
    }
}
