//! Export and import options.
//!
//! Every option has a default, so the UI can send only what the user
//! changed. Field names are camelCase on the wire.

use std::collections::BTreeMap;

use omniquery_schema::BackendType;
use serde::{Deserialize, Serialize};

/// Text alignment within a Markdown column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Left-align text (pad on the right).
    #[default]
    Left,
    /// Right-align text (pad on the left).
    Right,
    /// Center text (pad on both sides).
    Center,
}

/// Alignment for every column, or per column name.
///
/// On the wire this is either a single tag (`"center"`) or a map
/// (`{"price": "right"}`). Columns missing from the map are left-aligned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alignment {
    All(Align),
    PerColumn(BTreeMap<String, Align>),
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::All(Align::Left)
    }
}

impl Alignment {
    /// Returns the alignment of `column`.
    pub fn for_column(&self, column: &str) -> Align {
        match self {
            Alignment::All(align) => *align,
            Alignment::PerColumn(map) => map.get(column).copied().unwrap_or_default(),
        }
    }
}

/// Options for [`to_csv`](crate::to_csv).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CsvExportOptions {
    pub include_headers: bool,
    /// Field delimiter; must be a single ASCII character.
    pub delimiter: char,
    /// `"\n"` or `"\r\n"`.
    pub line_ending: String,
    /// Text written for null values.
    pub null_value: String,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        CsvExportOptions {
            include_headers: true,
            delimiter: ',',
            line_ending: "\n".to_string(),
            null_value: String::new(),
        }
    }
}

impl CsvExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }

    pub fn null_value(mut self, null_value: impl Into<String>) -> Self {
        self.null_value = null_value.into();
        self
    }
}

/// Options for [`to_json`](crate::to_json).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonExportOptions {
    pub pretty: bool,
    /// Spaces per indentation level when `pretty`.
    pub indent: usize,
    /// Export only these columns, in this order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl Default for JsonExportOptions {
    fn default() -> Self {
        JsonExportOptions {
            pretty: true,
            indent: 2,
            columns: None,
        }
    }
}

impl JsonExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

/// Options for [`to_sql`](crate::to_sql).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqlExportOptions {
    /// Target backend; picks identifier quoting and literal rules.
    pub db_type: BackendType,
    /// Schema qualifier; empty for none.
    pub schema: String,
    /// Target table. Required.
    pub table: String,
    /// Emit the column list after the table name.
    pub include_columns: bool,
    /// Rows per INSERT statement.
    pub batch_size: usize,
}

impl Default for SqlExportOptions {
    fn default() -> Self {
        SqlExportOptions {
            db_type: BackendType::Postgres,
            schema: String::new(),
            table: String::new(),
            include_columns: true,
            batch_size: 1,
        }
    }
}

impl SqlExportOptions {
    /// Creates options targeting `table` with the default settings.
    pub fn new(table: impl Into<String>) -> Self {
        SqlExportOptions {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn db_type(mut self, db_type: BackendType) -> Self {
        self.db_type = db_type;
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn include_columns(mut self, include: bool) -> Self {
        self.include_columns = include;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Options for [`to_markdown`](crate::to_markdown).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownOptions {
    pub alignment: Alignment,
    /// Maximum display width of a cell; `0` is unlimited.
    pub max_column_width: usize,
    pub null_value: String,
}

impl MarkdownOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn align(mut self, align: Align) -> Self {
        self.alignment = Alignment::All(align);
        self
    }

    /// Sets the alignment of one column, keeping the others left-aligned.
    pub fn align_column(mut self, column: impl Into<String>, align: Align) -> Self {
        let mut map = match self.alignment {
            Alignment::PerColumn(map) => map,
            Alignment::All(_) => BTreeMap::new(),
        };
        map.insert(column.into(), align);
        self.alignment = Alignment::PerColumn(map);
        self
    }

    pub fn max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    pub fn null_value(mut self, null_value: impl Into<String>) -> Self {
        self.null_value = null_value.into();
        self
    }
}

/// Options for [`parse_csv`](crate::parse_csv).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CsvImportOptions {
    pub has_headers: bool,
    pub delimiter: char,
    /// Drop rows whose fields are all blank.
    pub skip_empty_lines: bool,
    /// Trim surrounding whitespace from every field.
    pub trim_values: bool,
}

impl Default for CsvImportOptions {
    fn default() -> Self {
        CsvImportOptions {
            has_headers: true,
            delimiter: ',',
            skip_empty_lines: true,
            trim_values: true,
        }
    }
}

impl CsvImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn skip_empty_lines(mut self, skip: bool) -> Self {
        self.skip_empty_lines = skip;
        self
    }

    pub fn trim_values(mut self, trim: bool) -> Self {
        self.trim_values = trim;
        self
    }
}

/// Options for [`parse_json`](crate::parse_json).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonImportOptions {
    /// Dotted path to the array of rows, e.g. `data.items`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

impl JsonImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }
}

/// Converts a delimiter to the single byte the CSV reader and writer need.
pub(crate) fn delimiter_byte(delimiter: char) -> u8 {
    match u8::try_from(delimiter) {
        Ok(byte) if byte.is_ascii() => byte,
        _ => {
            tracing::warn!(%delimiter, "delimiter is not a single ASCII character, using ','");
            b','
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let csv = CsvExportOptions::default();
        assert!(csv.include_headers);
        assert_eq!(csv.delimiter, ',');
        assert_eq!(csv.line_ending, "\n");
        assert_eq!(csv.null_value, "");

        let json = JsonExportOptions::default();
        assert!(json.pretty);
        assert_eq!(json.indent, 2);

        let sql = SqlExportOptions::default();
        assert_eq!(sql.db_type, BackendType::Postgres);
        assert_eq!(sql.batch_size, 1);
        assert!(sql.include_columns);

        let md = MarkdownOptions::default();
        assert_eq!(md.alignment, Alignment::All(Align::Left));
        assert_eq!(md.max_column_width, 0);

        let import = CsvImportOptions::default();
        assert!(import.has_headers && import.skip_empty_lines && import.trim_values);
    }

    #[test]
    fn partial_wire_options() {
        let sql: SqlExportOptions =
            serde_json::from_value(json!({"dbType": "mysql", "table": "users", "batchSize": 50}))
                .unwrap();
        assert_eq!(sql.db_type, BackendType::MySql);
        assert_eq!(sql.table, "users");
        assert_eq!(sql.batch_size, 50);
        assert!(sql.include_columns);

        let md: MarkdownOptions =
            serde_json::from_value(json!({"alignment": {"price": "right"}})).unwrap();
        assert_eq!(md.alignment.for_column("price"), Align::Right);
        assert_eq!(md.alignment.for_column("name"), Align::Left);

        let md: MarkdownOptions = serde_json::from_value(json!({"alignment": "center"})).unwrap();
        assert_eq!(md.alignment, Alignment::All(Align::Center));
    }

    #[test]
    fn alignment_builder() {
        let options = MarkdownOptions::new()
            .align_column("a", Align::Right)
            .align_column("b", Align::Center);
        assert_eq!(options.alignment.for_column("a"), Align::Right);
        assert_eq!(options.alignment.for_column("b"), Align::Center);
        assert_eq!(options.alignment.for_column("c"), Align::Left);
    }

    #[test]
    fn delimiter_bytes() {
        assert_eq!(delimiter_byte(';'), b';');
        assert_eq!(delimiter_byte('\t'), b'\t');
        assert_eq!(delimiter_byte('é'), b',');
    }
}
