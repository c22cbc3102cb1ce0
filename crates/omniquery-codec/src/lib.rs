//! Text formats for tabular results.
//!
//! Rows are `serde_json` objects plus an explicit column list, which fixes
//! the column order for every format.
//!
//! | Format   | Export         | Import           |
//! |----------|----------------|------------------|
//! | CSV      | [`to_csv`]     | [`parse_csv`]    |
//! | JSON     | [`to_json`]    | [`parse_json`]   |
//! | NDJSON   | [`to_ndjson`]  | [`parse_ndjson`] |
//! | SQL      | [`to_sql`]     |                  |
//! | Markdown | [`to_markdown`]|                  |
//!
//! SQL scripts can also be split into statements ([`split_statements`]) and
//! laid out one clause per line ([`format_sql`]).
//!
//! Imports never fail on bad records. Ragged rows, malformed lines and
//! renamed headers are reported in [`ImportResult::warnings`].
//!
//! # Example
//!
//! ```rust
//! use omniquery_codec::{parse_csv, to_json, CsvImportOptions, JsonExportOptions};
//!
//! let imported = parse_csv("id,city\n1,Oslo\n2,Lima\n", &CsvImportOptions::default());
//! assert_eq!(imported.columns, ["id", "city"]);
//!
//! let json = to_json(&imported.rows, &JsonExportOptions::new().pretty(false)).unwrap();
//! assert_eq!(json, r#"[{"id":"1","city":"Oslo"},{"id":"2","city":"Lima"}]"#);
//! ```

mod delimited;
mod error;
mod import;
mod json;
mod markdown;
mod options;
mod split;
mod sql;
mod sql_format;

// Re-export public API
pub use delimited::{parse_csv, to_csv};
pub use error::{CodecError, Result};
pub use import::{ImportResult, Row};
pub use json::{parse_json, parse_ndjson, to_json, to_ndjson};
pub use markdown::to_markdown;
pub use options::{
    Align, Alignment, CsvExportOptions, CsvImportOptions, JsonExportOptions, JsonImportOptions,
    MarkdownOptions, SqlExportOptions,
};
pub use split::split_statements;
pub use sql::{sql_literal, to_sql};
pub use sql_format::format_sql;
