//! Column metadata supplied by schema introspection.

use serde::{Deserialize, Serialize};

/// Describes one column (or document field) of a table or collection.
///
/// Produced by the schema-introspection collaborator and treated as read-only
/// input everywhere in this workspace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    /// Column name as reported by the backend.
    pub name: String,
    /// Declared type name, e.g. `bigint`, `timestamptz`, `text`.
    #[serde(default)]
    pub data_type: String,
    /// Whether this column is (part of) the primary key.
    #[serde(default)]
    pub is_primary_key: bool,
}

impl ColumnMetadata {
    /// Creates a non-key column.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        ColumnMetadata {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
        }
    }

    /// Creates a primary-key column.
    pub fn primary_key(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        ColumnMetadata {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: true,
        }
    }
}

/// Finds a column by exact name.
pub fn find_column<'a>(columns: &'a [ColumnMetadata], name: &str) -> Option<&'a ColumnMetadata> {
    columns.iter().find(|c| c.name == name)
}
