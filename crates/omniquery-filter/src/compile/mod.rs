//! Dialect compilers.
//!
//! Each backend family gets its own compiler turning validated
//! [`FilterCondition`]s into a native predicate:
//!
//! | Family | Compiler | Output |
//! |--------|----------|--------|
//! | Relational | [`SqlCompiler`] | parameterized WHERE clause |
//! | Document | [`DocumentCompiler`] | nested predicate object |
//! | Wide-column | [`WideColumnCompiler`] | CQL WHERE clause + relaxed-scan flag |
//!
//! Compilers never fail as a whole. A filter that cannot be expressed (an
//! operator that doesn't apply to the column's type, an operator the dialect
//! can't evaluate server-side) is left out and reported in `skipped`, so one
//! bad filter chip doesn't break the rest of the query.
//!
//! [`compile_filters`] is the single dispatch point from a [`BackendType`].

mod document;
mod sql;
mod wide_column;

pub use document::{DocumentCompiler, DocumentPredicate};
pub use sql::{SqlCompiler, SqlPredicate};
pub use wide_column::{needs_relaxed_scan, CqlPredicate, WideColumnCompiler};

use omniquery_schema::{find_column, BackendFamily, BackendType, ColumnMetadata};
use serde::{Deserialize, Serialize};

use crate::condition::FilterCondition;
use crate::operator::{Operator, ValueClass};
use crate::value::Scalar;

/// How the terms of a compiled predicate are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    /// Returns the SQL keyword for this combinator.
    pub fn keyword(self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

/// Why a filter was left out of a compiled predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The operator does not apply to the column's value class.
    OperatorNotApplicable { class: ValueClass },
    /// The operands don't fit the operator (e.g. an empty `in` list).
    InvalidValue,
    /// The dialect can't evaluate it; the caller must apply it after retrieval.
    ClientSide,
    /// The backend has no predicate language at all.
    UnsupportedBackend,
}

/// A filter that was not compiled, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFilter {
    pub id: String,
    pub column_name: String,
    pub operator: Operator,
    pub reason: SkipReason,
}

impl SkippedFilter {
    pub(crate) fn new(filter: &FilterCondition, reason: SkipReason) -> Self {
        tracing::debug!(
            id = %filter.id,
            column = %filter.column_name,
            operator = %filter.operator,
            ?reason,
            "filter skipped during compilation"
        );
        SkippedFilter {
            id: filter.id.clone(),
            column_name: filter.column_name.clone(),
            operator: filter.operator,
            reason,
        }
    }
}

/// Backend-native predicate produced by [`compile_filters`].
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledQuery {
    Sql(SqlPredicate),
    Document(DocumentPredicate),
    WideColumn(CqlPredicate),
    /// The backend can't filter server-side; every filter is in `skipped`.
    Unsupported { skipped: Vec<SkippedFilter> },
}

impl CompiledQuery {
    /// Filters that were left out of the predicate.
    pub fn skipped(&self) -> &[SkippedFilter] {
        match self {
            CompiledQuery::Sql(p) => &p.skipped,
            CompiledQuery::Document(p) => &p.skipped,
            CompiledQuery::WideColumn(p) => &p.skipped,
            CompiledQuery::Unsupported { skipped } => skipped,
        }
    }

    /// Returns `true` if the predicate matches everything.
    pub fn is_empty(&self) -> bool {
        match self {
            CompiledQuery::Sql(p) => p.is_empty(),
            CompiledQuery::Document(p) => p.is_empty(),
            CompiledQuery::WideColumn(p) => p.is_empty(),
            CompiledQuery::Unsupported { .. } => true,
        }
    }
}

/// Compiles filters for a backend, picking the compiler by backend family.
///
/// Unknown backends fall back to ANSI SQL. Key-value backends produce
/// [`CompiledQuery::Unsupported`].
///
/// # Example
///
/// ```
/// use omniquery_filter::{compile_filters, CompiledQuery, FilterCondition, Logic, Operator};
/// use omniquery_schema::BackendType;
///
/// let filters = vec![FilterCondition::new("1", "age", Operator::GreaterThan, 21i64)];
/// match compile_filters(BackendType::Postgres, &filters, Logic::And, None) {
///     CompiledQuery::Sql(sql) => assert_eq!(sql.where_clause, "(\"age\" > $1)"),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn compile_filters(
    backend: BackendType,
    filters: &[FilterCondition],
    logic: Logic,
    columns: Option<&[ColumnMetadata]>,
) -> CompiledQuery {
    match backend.family() {
        BackendFamily::Relational | BackendFamily::Unknown => CompiledQuery::Sql(
            SqlCompiler::new(backend.sql_flavor())
                .with_columns(columns)
                .compile(filters, logic),
        ),
        BackendFamily::Document => CompiledQuery::Document(
            DocumentCompiler::new()
                .with_columns(columns)
                .compile(filters, logic),
        ),
        BackendFamily::WideColumn => CompiledQuery::WideColumn(
            WideColumnCompiler::new()
                .with_columns(columns)
                .compile(filters, logic),
        ),
        BackendFamily::KeyValue => CompiledQuery::Unsupported {
            skipped: filters
                .iter()
                .map(|f| SkippedFilter::new(f, SkipReason::UnsupportedBackend))
                .collect(),
        },
    }
}

/// Resolved operands of one filter, shared by all compilers.
pub(crate) enum Operands {
    None,
    One(Scalar),
    Two(Scalar, Scalar),
    Many(Vec<Scalar>),
}

/// Looks up the column's value class and checks the operator applies to it.
///
/// Columns missing from the metadata (or no metadata at all) are not
/// checked: document stores routinely filter on fields the sampled schema
/// never saw.
pub(crate) fn column_class(
    filter: &FilterCondition,
    columns: Option<&[ColumnMetadata]>,
) -> Result<Option<ValueClass>, SkipReason> {
    let Some(column) = columns.and_then(|cols| find_column(cols, &filter.column_name)) else {
        return Ok(None);
    };
    let class = ValueClass::from_data_type(&column.data_type);
    if filter.operator.applies_to(class) {
        Ok(Some(class))
    } else {
        Err(SkipReason::OperatorNotApplicable { class })
    }
}

/// Extracts and coerces the operands a filter's operator needs.
pub(crate) fn operands(
    filter: &FilterCondition,
    class: Option<ValueClass>,
) -> Result<Operands, SkipReason> {
    let op = filter.operator;
    if !op.needs_value() {
        return Ok(Operands::None);
    }
    if op == Operator::In {
        let items = crate::validate::split_list(&filter.value);
        if items.is_empty() {
            return Err(SkipReason::InvalidValue);
        }
        return Ok(Operands::Many(
            items.iter().map(|item| coerce(item, class, op)).collect(),
        ));
    }
    let first = filter
        .value
        .as_single()
        .filter(|v| !v.is_null())
        .ok_or(SkipReason::InvalidValue)?;
    if op == Operator::Between {
        let second = filter
            .value2
            .as_ref()
            .filter(|v| !v.is_blank())
            .ok_or(SkipReason::InvalidValue)?;
        return Ok(Operands::Two(coerce(first, class, op), coerce(second, class, op)));
    }
    Ok(Operands::One(coerce(first, class, op)))
}

/// Converts string operands to the column's native type where possible.
///
/// Without metadata, numeric-looking strings are still treated as numbers
/// for ordering comparisons so `age > "9"` doesn't compare lexically.
pub(crate) fn coerce(value: &Scalar, class: Option<ValueClass>, op: Operator) -> Scalar {
    if op.is_text_match() {
        return value.clone();
    }
    let coerced = match class {
        Some(ValueClass::Numeric) => value.parse_number().map(Scalar::Number),
        Some(ValueClass::Boolean) => value.parse_bool().map(Scalar::Bool),
        Some(ValueClass::DateTime) => value.parse_date().map(Scalar::Date),
        Some(ValueClass::String) => None,
        None if op.is_range() => value.parse_number().map(Scalar::Number),
        None => None,
    };
    coerced.unwrap_or_else(|| value.clone())
}
