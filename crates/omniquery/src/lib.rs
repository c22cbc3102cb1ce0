//! # Omniquery - One Data Layer for Many Databases
//!
//! Omniquery is the pure, synchronous core of a multi-database client. It
//! turns what a user builds in a data grid into something each backend
//! understands, and turns what backends return into something a grid and an
//! export dialog can use. It performs no I/O.
//!
//! - Filters: validate UI drafts and compile them to parameterized SQL,
//!   document-store queries or CQL
//! - Documents: find record identity, flatten nested documents to paths and
//!   back, infer column types
//! - Codecs: CSV, JSON, NDJSON, SQL INSERT and Markdown, plus SQL script
//!   splitting and layout
//!
//! The parts live in separate crates and are re-exported here, both flat and
//! as the [`schema`], [`filter`], [`document`] and [`codec`] modules.
//!
//! ## Quick Start
//!
//! ```rust
//! use omniquery::{
//!     compile_filters, validate_filter, BackendType, ColumnMetadata, CompiledQuery,
//!     FilterInput, Logic, Scalar,
//! };
//!
//! let columns = vec![
//!     ColumnMetadata::primary_key("id", "integer"),
//!     ColumnMetadata::new("name", "text"),
//! ];
//! let draft = FilterInput::new("f1", "name", "starts_with", Scalar::from("Ad"));
//! let condition = validate_filter(&draft).unwrap();
//!
//! match compile_filters(BackendType::Postgres, &[condition], Logic::And, Some(&columns)) {
//!     CompiledQuery::Sql(sql) => {
//!         assert_eq!(sql.to_where(), "WHERE (\"name\" ILIKE $1)");
//!         assert_eq!(sql.params, vec![Scalar::from("Ad%")]);
//!     }
//!     other => panic!("expected SQL, got {:?}", other),
//! }
//! ```
//!
//! ## Backends
//!
//! [`BackendType`] is a closed set. Each backend belongs to a
//! [`BackendFamily`], and [`compile_filters`] picks the compiler by family:
//!
//! | Family      | Backends                                        | Output              |
//! |-------------|-------------------------------------------------|---------------------|
//! | Relational  | Postgres, MySQL, MariaDB, SQLite, SQL Server, Oracle, CockroachDB | [`SqlPredicate`] |
//! | Document    | MongoDB, DocumentDB, CouchDB                    | [`DocumentPredicate`] |
//! | WideColumn  | Cassandra, ScyllaDB                             | [`CqlPredicate`]    |
//! | KeyValue    | Redis                                           | everything skipped  |
//! | Unknown     | anything else                                   | ANSI SQL            |
//!
//! Filters a backend cannot express are never errors. They are listed in
//! [`CompiledQuery::skipped`] with a [`SkipReason`], so the caller can apply
//! them client-side or tell the user.

pub use omniquery_codec as codec;
pub use omniquery_document as document;
pub use omniquery_filter as filter;
pub use omniquery_schema as schema;

// Schema
pub use omniquery_schema::{find_column, BackendFamily, BackendType, ColumnMetadata, SqlFlavor};

// Filters
pub use omniquery_filter::{
    compile_filters, create_filter, is_filter_empty, needs_relaxed_scan, operators_for,
    validate_all, validate_filter, CompiledQuery, CqlPredicate, DocumentPredicate,
    FilterCondition, FilterInput, FilterValue, IdGenerator, Logic, Operator, RandomIds, Scalar,
    SequentialIds, SkipReason, SkippedFilter, SqlPredicate, ValidationErrors, ValueClass,
};

// Documents
pub use omniquery_document::{
    composite_id, detect_type, extract_id, flatten, id_field, id_fields, infer_column_type,
    primary_key_projection, unflatten, DocumentIdInfo, FlattenOptions, FlattenedField,
    InferredColumnType, ValueType,
};

// Codecs
pub use omniquery_codec::{
    format_sql, parse_csv, parse_json, parse_ndjson, split_statements, to_csv, to_json,
    to_markdown, to_ndjson, to_sql, Align, CodecError, CsvExportOptions, CsvImportOptions,
    ImportResult, JsonExportOptions, JsonImportOptions, MarkdownOptions, Row, SqlExportOptions,
};
