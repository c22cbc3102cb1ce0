//! Filter conditions for every backend omniquery talks to.
//!
//! A filter is described once, as a [`FilterCondition`], and compiled into
//! whatever the target backend speaks:
//!
//! - Relational engines get a parameterized WHERE clause ([`SqlPredicate`])
//! - Document stores get a nested predicate object ([`DocumentPredicate`])
//! - Wide-column stores get a CQL WHERE clause plus a relaxed-scan flag
//!   ([`CqlPredicate`])
//!
//! # Quick Start
//!
//! ```rust
//! use omniquery_filter::{compile_filters, validate_filter, CompiledQuery, FilterInput, Logic, Scalar};
//! use omniquery_schema::BackendType;
//!
//! // Drafts come from the UI with loosely typed operands
//! let drafts = vec![
//!     FilterInput::new("1", "age", "between", Scalar::from("18")).with_value2("65"),
//!     FilterInput::new("2", "country", "in", Scalar::from("NO, SE, DK")),
//! ];
//!
//! let filters: Vec<_> = drafts
//!     .iter()
//!     .map(validate_filter)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! match compile_filters(BackendType::Postgres, &filters, Logic::And, None) {
//!     CompiledQuery::Sql(sql) => {
//!         assert_eq!(
//!             sql.where_clause,
//!             "(\"age\" >= $1 AND \"age\" <= $2) AND (\"country\" IN ($3, $4, $5))"
//!         );
//!         assert_eq!(sql.params.len(), 5);
//!     }
//!     other => panic!("expected SQL, got {:?}", other),
//! }
//! ```
//!
//! # Operators
//!
//! | Class | Operators |
//! |-------|-----------|
//! | String | `equals`, `not_equals`, `contains`, `not_contains`, `starts_with`, `ends_with`, `in`, `is_null`, `is_not_null` |
//! | Numeric | `equals`, `not_equals`, `greater_than`, `less_than`, `greater_than_or_equal`, `less_than_or_equal`, `between`, `in`, `is_null`, `is_not_null` |
//! | DateTime | as Numeric, without `in` |
//! | Boolean | `equals`, `not_equals`, `is_null`, `is_not_null` |
//!
//! # Degradation
//!
//! Compilation never fails. Filters a dialect can't express are reported in
//! the predicate's `skipped` list (and, for CQL, in `client_side`) rather
//! than raised as errors.

mod compile;
mod condition;
mod error;
mod ids;
mod operator;
mod validate;
mod value;

// Re-export public API
pub use compile::{
    compile_filters, needs_relaxed_scan, CompiledQuery, CqlPredicate, DocumentCompiler,
    DocumentPredicate, Logic, SkipReason, SkippedFilter, SqlCompiler, SqlPredicate,
    WideColumnCompiler,
};
pub use condition::{create_filter, is_filter_empty, FilterCondition, FilterInput};
pub use error::{Result, ValidationErrors};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use operator::{metadata_for, operators_for, Operator, OperatorMetadata, ValueClass};
pub use validate::{split_list, validate_all, validate_filter};
pub use value::{FilterValue, Number, Scalar};
