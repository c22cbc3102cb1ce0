//! Filter operators and their static metadata.
//!
//! The [`Operator`] enum is the closed set of comparison operators a filter
//! chip can carry. Each operator has an [`OperatorMetadata`] entry describing
//! how many operands it takes and which [`ValueClass`]es it applies to.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Comparison operator of a filter condition.
///
/// Operators are grouped by arity:
/// - **No value**: `IsNull`, `IsNotNull`
/// - **Two values**: `Between`
/// - **Comma-separated / multi-value**: `In`
/// - **Single value**: everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    // Universal operators
    /// Exact match. Blank strings are legitimate operands.
    Equals,
    /// Not equal. Blank strings are legitimate operands.
    NotEquals,

    // Text operators
    /// Case-insensitive substring match.
    Contains,
    /// Negated case-insensitive substring match.
    NotContains,
    /// Case-insensitive prefix match.
    StartsWith,
    /// Case-insensitive suffix match.
    EndsWith,

    // Ordering operators
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    /// Inclusive range; takes two operands.
    Between,

    // Set membership
    /// Value is one of a list; accepts a comma-separated string or an array.
    In,

    // Null checks
    IsNull,
    IsNotNull,
}

/// Broad class of values a column holds, derived from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueClass {
    String,
    Numeric,
    DateTime,
    Boolean,
}

/// Static description of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorMetadata {
    /// Human-readable label for the UI.
    pub label: &'static str,
    /// Whether the operator takes an operand at all.
    pub needs_value: bool,
    /// Whether the operator takes a second operand.
    pub needs_two_values: bool,
    /// Whether the operand is a comma-separated list.
    pub needs_comma_separated: bool,
    /// Value classes the operator can be applied to.
    pub applicable: &'static [ValueClass],
}

const ALL_CLASSES: &[ValueClass] = &[
    ValueClass::String,
    ValueClass::Numeric,
    ValueClass::DateTime,
    ValueClass::Boolean,
];
const TEXT: &[ValueClass] = &[ValueClass::String];
const ORDERED: &[ValueClass] = &[ValueClass::Numeric, ValueClass::DateTime];
const LISTABLE: &[ValueClass] = &[ValueClass::String, ValueClass::Numeric];

const fn single(label: &'static str, applicable: &'static [ValueClass]) -> OperatorMetadata {
    OperatorMetadata {
        label,
        needs_value: true,
        needs_two_values: false,
        needs_comma_separated: false,
        applicable,
    }
}

const EQUALS: OperatorMetadata = single("equals", ALL_CLASSES);
const NOT_EQUALS: OperatorMetadata = single("not equals", ALL_CLASSES);
const CONTAINS: OperatorMetadata = single("contains", TEXT);
const NOT_CONTAINS: OperatorMetadata = single("does not contain", TEXT);
const STARTS_WITH: OperatorMetadata = single("starts with", TEXT);
const ENDS_WITH: OperatorMetadata = single("ends with", TEXT);
const GREATER_THAN: OperatorMetadata = single("greater than", ORDERED);
const LESS_THAN: OperatorMetadata = single("less than", ORDERED);
const GREATER_THAN_OR_EQUAL: OperatorMetadata = single("greater than or equal", ORDERED);
const LESS_THAN_OR_EQUAL: OperatorMetadata = single("less than or equal", ORDERED);
const BETWEEN: OperatorMetadata = OperatorMetadata {
    label: "between",
    needs_value: true,
    needs_two_values: true,
    needs_comma_separated: false,
    applicable: ORDERED,
};
const IN: OperatorMetadata = OperatorMetadata {
    label: "in list",
    needs_value: true,
    needs_two_values: false,
    needs_comma_separated: true,
    applicable: LISTABLE,
};
const IS_NULL: OperatorMetadata = OperatorMetadata {
    label: "is null",
    needs_value: false,
    needs_two_values: false,
    needs_comma_separated: false,
    applicable: ALL_CLASSES,
};
const IS_NOT_NULL: OperatorMetadata = OperatorMetadata {
    label: "is not null",
    ..IS_NULL
};

impl Operator {
    /// Every operator, in UI display order.
    pub const ALL: [Operator; 14] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::Between,
        Operator::In,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Parses a wire tag such as `greater_than`. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.as_str() == tag)
    }

    /// Returns the wire tag of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::GreaterThanOrEqual => "greater_than_or_equal",
            Operator::LessThanOrEqual => "less_than_or_equal",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
        }
    }

    /// Returns the static metadata for this operator.
    pub fn metadata(self) -> &'static OperatorMetadata {
        match self {
            Operator::Equals => &EQUALS,
            Operator::NotEquals => &NOT_EQUALS,
            Operator::Contains => &CONTAINS,
            Operator::NotContains => &NOT_CONTAINS,
            Operator::StartsWith => &STARTS_WITH,
            Operator::EndsWith => &ENDS_WITH,
            Operator::GreaterThan => &GREATER_THAN,
            Operator::LessThan => &LESS_THAN,
            Operator::GreaterThanOrEqual => &GREATER_THAN_OR_EQUAL,
            Operator::LessThanOrEqual => &LESS_THAN_OR_EQUAL,
            Operator::Between => &BETWEEN,
            Operator::In => &IN,
            Operator::IsNull => &IS_NULL,
            Operator::IsNotNull => &IS_NOT_NULL,
        }
    }

    /// Returns `true` if the operator takes an operand.
    pub fn needs_value(self) -> bool {
        self.metadata().needs_value
    }

    /// Returns `true` if the operator can be applied to the given class.
    pub fn applies_to(self, class: ValueClass) -> bool {
        self.metadata().applicable.contains(&class)
    }

    /// Returns `true` for the pattern-matching text operators.
    pub fn is_text_match(self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::NotContains | Operator::StartsWith | Operator::EndsWith
        )
    }

    /// Returns `true` for the ordering comparisons, including `Between`.
    pub fn is_range(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::LessThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThanOrEqual
                | Operator::Between
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the metadata for an operator.
pub fn metadata_for(op: Operator) -> &'static OperatorMetadata {
    op.metadata()
}

/// Returns the operators applicable to a value class, in display order.
///
/// ```
/// use omniquery_filter::{operators_for, Operator, ValueClass};
///
/// let ops = operators_for(ValueClass::Boolean);
/// assert_eq!(
///     ops,
///     vec![Operator::Equals, Operator::NotEquals, Operator::IsNull, Operator::IsNotNull]
/// );
/// ```
pub fn operators_for(class: ValueClass) -> Vec<Operator> {
    Operator::ALL
        .into_iter()
        .filter(|op| op.applies_to(class))
        .collect()
}

static BOOLEAN_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(bool|boolean|bit)$").expect("valid boolean type pattern"));

static DATE_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(date|time|smalldatetime|interval|year)").expect("valid date type pattern")
});

static NUMERIC_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(u?(tiny|small|medium|big)?int(eger)?\d*|(small|big)?serial\d*|long|dec|decimal\d*|numeric|number|float\d*|double|real|(small)?money|counter|varint)$",
    )
    .expect("valid numeric type pattern")
});

impl ValueClass {
    /// Classifies a declared column type.
    ///
    /// Case-insensitive. Length/precision arguments, `unsigned` and trailing
    /// qualifiers (`double precision`, `timestamp with time zone`) are ignored.
    /// Unknown types fall back to [`ValueClass::String`].
    ///
    /// ```
    /// use omniquery_filter::ValueClass;
    ///
    /// assert_eq!(ValueClass::from_data_type("BIGINT"), ValueClass::Numeric);
    /// assert_eq!(ValueClass::from_data_type("decimal(10,2)"), ValueClass::Numeric);
    /// assert_eq!(ValueClass::from_data_type("timestamptz"), ValueClass::DateTime);
    /// assert_eq!(ValueClass::from_data_type("point"), ValueClass::String);
    /// ```
    pub fn from_data_type(data_type: &str) -> ValueClass {
        let lowered = data_type.trim().to_ascii_lowercase();
        let base = lowered
            .split('(')
            .next()
            .unwrap_or_default()
            .trim_end_matches("[]")
            .trim();
        let base = base.strip_prefix("unsigned ").unwrap_or(base);
        let first_word = base.split_whitespace().next().unwrap_or_default();

        if BOOLEAN_TYPE.is_match(first_word) {
            ValueClass::Boolean
        } else if DATE_TYPE.is_match(first_word) {
            ValueClass::DateTime
        } else if NUMERIC_TYPE.is_match(first_word) {
            ValueClass::Numeric
        } else {
            ValueClass::String
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_invariants() {
        let no_value: Vec<_> = Operator::ALL
            .into_iter()
            .filter(|op| !op.metadata().needs_value)
            .collect();
        assert_eq!(no_value, vec![Operator::IsNull, Operator::IsNotNull]);

        let two_values: Vec<_> = Operator::ALL
            .into_iter()
            .filter(|op| op.metadata().needs_two_values)
            .collect();
        assert_eq!(two_values, vec![Operator::Between]);

        let multi: Vec<_> = Operator::ALL
            .into_iter()
            .filter(|op| op.metadata().needs_comma_separated)
            .collect();
        assert_eq!(multi, vec![Operator::In]);
    }

    #[test]
    fn tags_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_tag(op.as_str()), Some(op));
        }
        assert_eq!(Operator::from_tag("like"), None);
        assert_eq!(Operator::from_tag("EQUALS"), None);
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&Operator::GreaterThanOrEqual).unwrap();
        assert_eq!(json, "\"greater_than_or_equal\"");
        let op: Operator = serde_json::from_str("\"is_not_null\"").unwrap();
        assert_eq!(op, Operator::IsNotNull);
    }

    #[test]
    fn classification() {
        let cases = [
            ("int", ValueClass::Numeric),
            ("INT4", ValueClass::Numeric),
            ("bigint unsigned", ValueClass::Numeric),
            ("unsigned int", ValueClass::Numeric),
            ("double precision", ValueClass::Numeric),
            ("numeric(12, 4)", ValueClass::Numeric),
            ("bigserial", ValueClass::Numeric),
            ("float8", ValueClass::Numeric),
            ("counter", ValueClass::Numeric),
            ("timestamp with time zone", ValueClass::DateTime),
            ("datetime2", ValueClass::DateTime),
            ("DATE", ValueClass::DateTime),
            ("interval", ValueClass::DateTime),
            ("boolean", ValueClass::Boolean),
            ("BOOL", ValueClass::Boolean),
            ("varchar(255)", ValueClass::String),
            ("character varying", ValueClass::String),
            ("uuid", ValueClass::String),
            ("point", ValueClass::String),
            ("jsonb", ValueClass::String),
            ("", ValueClass::String),
            ("mystery", ValueClass::String),
        ];
        for (input, expected) in cases {
            assert_eq!(ValueClass::from_data_type(input), expected, "type: {}", input);
        }
    }

    #[test]
    fn operators_per_class() {
        let text = operators_for(ValueClass::String);
        assert!(text.contains(&Operator::Contains));
        assert!(text.contains(&Operator::In));
        assert!(!text.contains(&Operator::GreaterThan));

        let numeric = operators_for(ValueClass::Numeric);
        assert!(numeric.contains(&Operator::Between));
        assert!(!numeric.contains(&Operator::StartsWith));

        let dates = operators_for(ValueClass::DateTime);
        assert!(dates.contains(&Operator::LessThan));
        assert!(!dates.contains(&Operator::In));
    }

    #[test]
    fn metadata_labels() {
        assert_eq!(metadata_for(Operator::NotContains).label, "does not contain");
        assert_eq!(Operator::IsNotNull.metadata().label, "is not null");
        assert!(!Operator::IsNotNull.needs_value());
    }
}
