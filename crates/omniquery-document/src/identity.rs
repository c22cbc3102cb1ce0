//! Record identity across backends.
//!
//! Which field identifies a row, document or partition depends on the
//! backend. Resolution order, first match wins:
//!
//! 1. Columns flagged as primary key (all of them, for composite keys)
//! 2. The backend's naming convention (`_id` for document stores, `key` for
//!    key-value stores)
//! 3. The first of [`FALLBACK_ID_FIELDS`] present in the columns, else `id`

use omniquery_schema::{BackendFamily, BackendType, ColumnMetadata};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generic id field names, in order of preference.
pub const FALLBACK_ID_FIELDS: [&str; 6] = ["id", "_id", "ID", "Id", "uuid", "key"];

/// Separator used by [`composite_id`] when callers have no preference.
pub const DEFAULT_SEPARATOR: &str = ":";

/// Identity fields of a table or collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIdInfo {
    pub primary_field: String,
    /// Every identity field in declaration order; never empty.
    pub all_fields: Vec<String>,
    pub is_composite: bool,
}

fn convention(backend: BackendType) -> Option<&'static str> {
    match backend.family() {
        BackendFamily::Document => Some("_id"),
        BackendFamily::KeyValue => Some("key"),
        BackendFamily::Relational | BackendFamily::WideColumn | BackendFamily::Unknown => None,
    }
}

fn fallback(columns: Option<&[ColumnMetadata]>) -> &'static str {
    columns
        .and_then(|cols| {
            FALLBACK_ID_FIELDS
                .into_iter()
                .find(|name| cols.iter().any(|c| c.name == *name))
        })
        .unwrap_or(FALLBACK_ID_FIELDS[0])
}

/// Returns the field identifying records of a table or collection.
///
/// ```
/// use omniquery_document::id_field;
/// use omniquery_schema::{BackendType, ColumnMetadata};
///
/// assert_eq!(id_field(None, BackendType::MongoDb), "_id");
/// assert_eq!(id_field(None, BackendType::Postgres), "id");
///
/// let cols = vec![ColumnMetadata::new("uuid", "uuid"), ColumnMetadata::new("name", "text")];
/// assert_eq!(id_field(Some(&cols), BackendType::Postgres), "uuid");
/// ```
pub fn id_field(columns: Option<&[ColumnMetadata]>, backend: BackendType) -> String {
    id_fields(columns, backend).primary_field
}

/// Returns every identity field, detecting composite primary keys.
pub fn id_fields(columns: Option<&[ColumnMetadata]>, backend: BackendType) -> DocumentIdInfo {
    let keys: Vec<String> = columns
        .unwrap_or_default()
        .iter()
        .filter(|c| c.is_primary_key)
        .map(|c| c.name.clone())
        .collect();

    if let Some(first) = keys.first() {
        return DocumentIdInfo {
            primary_field: first.clone(),
            is_composite: keys.len() > 1,
            all_fields: keys,
        };
    }

    let field = convention(backend).unwrap_or_else(|| fallback(columns));
    DocumentIdInfo {
        primary_field: field.to_string(),
        all_fields: vec![field.to_string()],
        is_composite: false,
    }
}

/// Returns the record's id as a string, or an empty string if the id field
/// is missing or null.
///
/// ```
/// use omniquery_document::extract_id;
/// use omniquery_schema::BackendType;
/// use serde_json::json;
///
/// let doc = json!({"_id": {"$oid": "507f1f77bcf86cd799439011"}, "name": "x"});
/// assert_eq!(extract_id(&doc, None, BackendType::MongoDb), "507f1f77bcf86cd799439011");
/// ```
pub fn extract_id(
    document: &Value,
    columns: Option<&[ColumnMetadata]>,
    backend: BackendType,
) -> String {
    let field = id_field(columns, backend);
    document.get(&field).map(id_text).unwrap_or_default()
}

/// Returns the record's id, joining the fields of a composite key with
/// `separator`. Missing key fields contribute an empty string.
pub fn composite_id(
    document: &Value,
    columns: Option<&[ColumnMetadata]>,
    backend: BackendType,
    separator: &str,
) -> String {
    let info = id_fields(columns, backend);
    if !info.is_composite {
        return extract_id(document, columns, backend);
    }
    info.all_fields
        .iter()
        .map(|field| document.get(field).map(id_text).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Returns a map holding exactly the identity fields of `document`, for
/// targeting updates and deletes. Missing fields map to null.
pub fn primary_key_projection(
    document: &Value,
    columns: Option<&[ColumnMetadata]>,
    backend: BackendType,
) -> Map<String, Value> {
    id_fields(columns, backend)
        .all_fields
        .into_iter()
        .map(|field| {
            let value = document.get(&field).cloned().unwrap_or(Value::Null);
            (field, value)
        })
        .collect()
}

/// Stringifies an id value.
///
/// Wrapped object ids yield the bare hex string. Other single-key extended
/// JSON wrappers (`$uuid`, `$numberLong`, ...) yield their inner text.
/// Anything else falls back to its JSON text.
fn id_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => {
            if let Some(oid) = map.get("$oid").and_then(Value::as_str) {
                return oid.to_string();
            }
            match wrapped_text(map) {
                Some(text) => text,
                None => value.to_string(),
            }
        }
        Value::Array(_) => value.to_string(),
    }
}

fn wrapped_text(map: &Map<String, Value>) -> Option<String> {
    if map.len() != 1 {
        return None;
    }
    let (key, inner) = map.iter().next()?;
    if !key.starts_with('$') {
        return None;
    }
    match inner {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
