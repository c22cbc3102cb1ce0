//! Wide-column compiler: CQL WHERE clauses.
//!
//! CQL can only serve equality and `IN` efficiently. Everything else is
//! still translated, but the predicate is flagged so the caller appends
//! `ALLOW FILTERING`. Operators CQL cannot evaluate at all are handed back
//! in `client_side` for the caller to apply after retrieval.

use omniquery_schema::{ColumnMetadata, SqlFlavor};

use super::{column_class, operands, Logic, Operands, SkipReason, SkippedFilter};
use crate::condition::FilterCondition;
use crate::operator::Operator;
use crate::value::Scalar;

/// Operators that force a relaxed (filtering) scan.
const RELAXED_SCAN_OPERATORS: &[Operator] = &[
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThanOrEqual,
    Operator::Between,
    Operator::Contains,
    Operator::StartsWith,
    Operator::EndsWith,
];

/// Returns `true` if any filter needs a relaxed scan.
///
/// This looks at operators only. [`WideColumnCompiler::compile`] sets the
/// flag from the terms it actually emits, so skipped filters don't count.
///
/// ```
/// use omniquery_filter::{needs_relaxed_scan, FilterCondition, Operator};
///
/// let gt = FilterCondition::new("1", "ts", Operator::GreaterThan, 5i64);
/// let eq = FilterCondition::new("2", "pk", Operator::Equals, 5i64);
/// assert!(needs_relaxed_scan(&[gt]));
/// assert!(!needs_relaxed_scan(&[eq]));
/// ```
pub fn needs_relaxed_scan(filters: &[FilterCondition]) -> bool {
    filters
        .iter()
        .any(|f| RELAXED_SCAN_OPERATORS.contains(&f.operator))
}

/// A compiled CQL predicate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CqlPredicate {
    /// Terms joined with `AND`, without the `WHERE` keyword.
    pub where_clause: String,
    pub params: Vec<Scalar>,
    /// The query must run with `ALLOW FILTERING`.
    pub needs_relaxed_scan: bool,
    /// `OR` was requested but the clause is `AND`-joined.
    pub logic_downgraded: bool,
    /// Filters the caller must apply to the retrieved rows.
    pub client_side: Vec<FilterCondition>,
    pub skipped: Vec<SkippedFilter>,
}

impl CqlPredicate {
    /// Returns `true` if no term was emitted.
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_empty()
    }

    /// Returns `WHERE <clause>`, followed by `ALLOW FILTERING` when relaxed.
    pub fn to_where(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        if self.needs_relaxed_scan {
            format!("WHERE {} ALLOW FILTERING", self.where_clause)
        } else {
            format!("WHERE {}", self.where_clause)
        }
    }
}

/// Compiles filters into a CQL WHERE clause.
///
/// CQL has no `OR`: with [`Logic::Or`] and more than one term the clause is
/// still `AND`-joined, `logic_downgraded` is set and a warning is logged.
///
/// Text matches compile to `LIKE`, which has no escape clause in CQL: a `%`
/// in the value matches like a wildcard.
#[derive(Debug, Clone, Copy, Default)]
pub struct WideColumnCompiler<'a> {
    columns: Option<&'a [ColumnMetadata]>,
}

impl<'a> WideColumnCompiler<'a> {
    pub fn new() -> Self {
        WideColumnCompiler { columns: None }
    }

    /// Supplies column metadata for type checks and operand coercion.
    pub fn with_columns(mut self, columns: Option<&'a [ColumnMetadata]>) -> Self {
        self.columns = columns;
        self
    }

    pub fn compile(&self, filters: &[FilterCondition], logic: Logic) -> CqlPredicate {
        let mut predicate = CqlPredicate::default();
        let mut terms = Vec::new();

        for filter in filters {
            if is_client_side(filter.operator) {
                predicate.client_side.push(filter.clone());
                predicate
                    .skipped
                    .push(SkippedFilter::new(filter, SkipReason::ClientSide));
                continue;
            }
            match self.compile_term(filter, &mut predicate.params) {
                Ok(term) => {
                    if RELAXED_SCAN_OPERATORS.contains(&filter.operator) {
                        predicate.needs_relaxed_scan = true;
                    }
                    terms.push(term);
                }
                Err(reason) => predicate.skipped.push(SkippedFilter::new(filter, reason)),
            }
        }

        if logic == Logic::Or && terms.len() > 1 {
            tracing::warn!(
                terms = terms.len(),
                "CQL has no OR; filters combined with AND instead"
            );
            predicate.logic_downgraded = true;
            predicate.needs_relaxed_scan = true;
        }

        predicate.where_clause = terms.join(" AND ");
        predicate
    }

    fn compile_term(
        &self,
        filter: &FilterCondition,
        params: &mut Vec<Scalar>,
    ) -> Result<String, SkipReason> {
        let class = column_class(filter, self.columns)?;
        let operands = operands(filter, class)?;
        let col = SqlFlavor::Ansi.quote_identifier(&filter.column_name);

        let term = match (filter.operator, operands) {
            (Operator::Between, Operands::Two(low, high)) => {
                params.push(low);
                params.push(high);
                format!("{} >= ? AND {} <= ?", col, col)
            }
            (Operator::In, Operands::Many(items)) => {
                let placeholders = vec!["?"; items.len()].join(", ");
                params.extend(items);
                format!("{} IN ({})", col, placeholders)
            }
            // CQL LIKE has no escape character, so `%` in the operand stays a
            // wildcard.
            (op, Operands::One(value)) if op.is_text_match() => {
                let text = value.to_text();
                let pattern = match op {
                    Operator::StartsWith => format!("{}%", text),
                    Operator::EndsWith => format!("%{}", text),
                    _ => format!("%{}%", text),
                };
                params.push(Scalar::String(pattern));
                format!("{} LIKE ?", col)
            }
            (op, Operands::One(value)) => {
                let symbol = comparison_symbol(op).ok_or(SkipReason::InvalidValue)?;
                params.push(value);
                format!("{} {} ?", col, symbol)
            }
            _ => return Err(SkipReason::InvalidValue),
        };
        Ok(term)
    }
}

fn is_client_side(op: Operator) -> bool {
    matches!(
        op,
        Operator::NotContains | Operator::IsNull | Operator::IsNotNull
    )
}

fn comparison_symbol(op: Operator) -> Option<&'static str> {
    match op {
        Operator::Equals => Some("="),
        Operator::NotEquals => Some("!="),
        Operator::GreaterThan => Some(">"),
        Operator::LessThan => Some("<"),
        Operator::GreaterThanOrEqual => Some(">="),
        Operator::LessThanOrEqual => Some("<="),
        _ => None,
    }
}
