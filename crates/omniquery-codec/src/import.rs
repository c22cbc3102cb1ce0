//! Shared shape of imported data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row: column name to value.
pub type Row = Map<String, Value>;

/// Rows decoded from text, with the problems met along the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub row_count: usize,
    /// Non-fatal issues, e.g. rows with the wrong number of fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Row>, warnings: Vec<String>) -> Self {
        ImportResult {
            row_count: rows.len(),
            columns,
            rows,
            warnings,
        }
    }

    /// Returns `true` if the import produced warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Collects import warnings and logs each one.
#[derive(Debug, Default)]
pub(crate) struct Warnings(Vec<String>);

impl Warnings {
    pub(crate) fn push(&mut self, message: String) {
        tracing::debug!(%message, "import warning");
        self.0.push(message);
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Collects the keys of `rows` in first-seen order.
pub(crate) fn columns_of<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Reorders a row to `columns`, filling missing keys with null.
pub(crate) fn rectangular(row: Row, columns: &[String]) -> Row {
    let mut row = row;
    columns
        .iter()
        .map(|column| {
            let value = row.remove(column).unwrap_or(Value::Null);
            (column.clone(), value)
        })
        .collect()
}
