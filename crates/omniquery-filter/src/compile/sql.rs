//! Relational compiler: parameterized SQL WHERE clauses.

use omniquery_schema::{ColumnMetadata, SqlFlavor};

use super::{column_class, operands, Logic, Operands, SkipReason, SkippedFilter};
use crate::condition::FilterCondition;
use crate::operator::Operator;
use crate::value::Scalar;

/// A compiled SQL predicate.
///
/// `where_clause` has no leading `WHERE` keyword; use [`SqlPredicate::to_where`]
/// when splicing it into a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlPredicate {
    pub where_clause: String,
    pub params: Vec<Scalar>,
    pub skipped: Vec<SkippedFilter>,
}

impl SqlPredicate {
    /// Returns `true` if no term was emitted.
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_empty()
    }

    /// Returns `WHERE <clause>`, or an empty string when there is no clause.
    pub fn to_where(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.where_clause)
        }
    }
}

/// Compiles filters into a WHERE clause for one SQL flavor.
///
/// Every term is parenthesized and joined with the chosen [`Logic`].
/// `between` expands to two comparisons, `in` to one placeholder per element,
/// and text operators to `LIKE` patterns with `%`, `_` and `\` escaped.
///
/// # Example
///
/// ```
/// use omniquery_filter::{FilterCondition, Logic, Operator, SqlCompiler};
/// use omniquery_schema::SqlFlavor;
///
/// let filters = vec![
///     FilterCondition::new("1", "name", Operator::StartsWith, "Jo"),
///     FilterCondition::in_list("2", "role", ["admin", "owner"]),
/// ];
/// let predicate = SqlCompiler::new(SqlFlavor::MySql).compile(&filters, Logic::And);
/// assert_eq!(
///     predicate.where_clause,
///     "(`name` LIKE ?) AND (`role` IN (?, ?))"
/// );
/// assert_eq!(predicate.params.len(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SqlCompiler<'a> {
    flavor: SqlFlavor,
    columns: Option<&'a [ColumnMetadata]>,
    first_placeholder: usize,
}

impl<'a> SqlCompiler<'a> {
    /// Creates a compiler for the given flavor.
    pub fn new(flavor: SqlFlavor) -> Self {
        SqlCompiler {
            flavor,
            columns: None,
            first_placeholder: 1,
        }
    }

    /// Supplies column metadata for type checks and operand coercion.
    pub fn with_columns(mut self, columns: Option<&'a [ColumnMetadata]>) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the index of the first placeholder, for predicates appended to a
    /// statement that already binds parameters.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.first_placeholder = index.max(1);
        self
    }

    /// Compiles the filters. Empty input yields an empty predicate.
    pub fn compile(&self, filters: &[FilterCondition], logic: Logic) -> SqlPredicate {
        let mut predicate = SqlPredicate::default();
        let mut terms = Vec::new();

        for filter in filters {
            match self.compile_term(filter, &mut predicate.params) {
                Ok(term) => terms.push(format!("({})", term)),
                Err(reason) => predicate.skipped.push(SkippedFilter::new(filter, reason)),
            }
        }

        predicate.where_clause = terms.join(&format!(" {} ", logic.keyword()));
        predicate
    }

    fn compile_term(
        &self,
        filter: &FilterCondition,
        params: &mut Vec<Scalar>,
    ) -> Result<String, SkipReason> {
        let class = column_class(filter, self.columns)?;
        let operands = operands(filter, class)?;
        let col = self.flavor.quote_identifier(&filter.column_name);

        let term = match (filter.operator, operands) {
            (Operator::IsNull, _) => format!("{} IS NULL", col),
            (Operator::IsNotNull, _) => format!("{} IS NOT NULL", col),
            (Operator::Between, Operands::Two(low, high)) => {
                let low = self.bind(params, low);
                let high = self.bind(params, high);
                format!("{} >= {} AND {} <= {}", col, low, col, high)
            }
            (Operator::In, Operands::Many(items)) => {
                let placeholders: Vec<String> =
                    items.into_iter().map(|item| self.bind(params, item)).collect();
                format!("{} IN ({})", col, placeholders.join(", "))
            }
            (op, Operands::One(value)) if op.is_text_match() => {
                let escaped = escape_like_pattern(&value.to_text());
                let pattern = match op {
                    Operator::StartsWith => format!("{}%", escaped),
                    Operator::EndsWith => format!("%{}", escaped),
                    _ => format!("%{}%", escaped),
                };
                let negated = op == Operator::NotContains;
                let placeholder = self.bind(params, Scalar::String(pattern));
                format!(
                    "{} {} {}{}",
                    col,
                    self.flavor.like_operator(negated),
                    placeholder,
                    self.flavor.like_escape_clause()
                )
            }
            (op, Operands::One(value)) => {
                let symbol = comparison_symbol(op).ok_or(SkipReason::InvalidValue)?;
                let placeholder = self.bind(params, value);
                format!("{} {} {}", col, symbol, placeholder)
            }
            _ => return Err(SkipReason::InvalidValue),
        };
        Ok(term)
    }

    fn bind(&self, params: &mut Vec<Scalar>, value: Scalar) -> String {
        params.push(value);
        self.flavor
            .placeholder(self.first_placeholder + params.len() - 1)
    }
}

fn comparison_symbol(op: Operator) -> Option<&'static str> {
    match op {
        Operator::Equals => Some("="),
        Operator::NotEquals => Some("<>"),
        Operator::GreaterThan => Some(">"),
        Operator::LessThan => Some("<"),
        Operator::GreaterThanOrEqual => Some(">="),
        Operator::LessThanOrEqual => Some("<="),
        _ => None,
    }
}

/// Escapes `LIKE` wildcards so user input matches literally.
pub(crate) fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
