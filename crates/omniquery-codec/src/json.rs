//! JSON and newline-delimited JSON encoding and decoding.

use omniquery_document::normalize_value;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::{CodecError, Result};
use crate::import::{columns_of, rectangular, ImportResult, Row, Warnings};
use crate::options::{JsonExportOptions, JsonImportOptions};

/// Writes rows as a JSON array.
///
/// Extended JSON wrappers are unwrapped (`{"$date": ..}` becomes an ISO-8601
/// string). With `columns` set, each row holds exactly those keys, in that
/// order, with null for missing values.
///
/// ```
/// use omniquery_codec::{to_json, JsonExportOptions};
/// use serde_json::json;
///
/// let rows = vec![json!({"id": 1, "tags": ["a"]}).as_object().unwrap().clone()];
/// let text = to_json(&rows, &JsonExportOptions::new().pretty(false)).unwrap();
/// assert_eq!(text, r#"[{"id":1,"tags":["a"]}]"#);
/// ```
pub fn to_json(rows: &[Row], options: &JsonExportOptions) -> Result<String> {
    let values: Vec<Value> = rows
        .iter()
        .map(|row| export_row(row, options.columns.as_deref()))
        .collect();
    if !options.pretty {
        return Ok(serde_json::to_string(&values)?);
    }
    let indent = " ".repeat(options.indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    values.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Writes rows as newline-delimited JSON, one compact object per line.
pub fn to_ndjson(rows: &[Row], columns: Option<&[String]>) -> Result<String> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(&export_row(row, columns))?);
        out.push('\n');
    }
    Ok(out)
}

fn export_row(row: &Row, columns: Option<&[String]>) -> Value {
    let map: Map<String, Value> = match columns {
        Some(columns) => columns
            .iter()
            .map(|c| (c.clone(), row.get(c).map_or(Value::Null, normalize_value)))
            .collect(),
        None => row
            .iter()
            .map(|(k, v)| (k.clone(), normalize_value(v)))
            .collect(),
    };
    Value::Object(map)
}

/// Parses a JSON document into rows.
///
/// A top-level array yields one row per element; a top-level object yields
/// one row. Elements that are not objects are wrapped as `{"value": x}`.
/// Malformed JSON yields an empty result with a warning.
///
/// With `data_path`, the rows are read from the array at that dotted path
/// instead; a path that is missing or does not lead to an array is an error.
///
/// ```
/// use omniquery_codec::{parse_json, JsonImportOptions};
///
/// let input = r#"{"data": {"items": [{"a": 1}, {"b": 2}]}}"#;
/// let result = parse_json(input, &JsonImportOptions::new().data_path("data.items")).unwrap();
/// assert_eq!(result.columns, ["a", "b"]);
/// assert_eq!(result.row_count, 2);
/// ```
pub fn parse_json(input: &str, options: &JsonImportOptions) -> Result<ImportResult> {
    let mut warnings = Warnings::default();
    let document: Value = match serde_json::from_str(input) {
        Ok(document) => document,
        Err(err) => {
            warnings.push(format!("Invalid JSON: {}", err));
            return Ok(ImportResult::new(Vec::new(), Vec::new(), warnings.into_vec()));
        }
    };

    let path = options
        .data_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let items = match path {
        Some(path) => match resolve_path(&document, path) {
            None => return Err(CodecError::DataPathNotFound(path.to_string())),
            Some(Value::Array(items)) => items.clone(),
            Some(_) => return Err(CodecError::DataPathNotArray(path.to_string())),
        },
        None => match document {
            Value::Array(items) => items,
            other => vec![other],
        },
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| into_row(item, index + 1, &mut warnings))
        .collect();
    Ok(finish(rows, warnings))
}

/// Parses newline-delimited JSON, one value per line.
///
/// Blank lines are skipped; lines that are not valid JSON are reported as
/// warnings and skipped.
pub fn parse_ndjson(input: &str) -> ImportResult {
    let mut warnings = Warnings::default();
    let mut rows = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => rows.push(into_row(value, index + 1, &mut warnings)),
            Err(err) => warnings.push(format!("Line {} is not valid JSON: {}", index + 1, err)),
        }
    }
    finish(rows, warnings)
}

fn finish(rows: Vec<Row>, warnings: Warnings) -> ImportResult {
    let columns = columns_of(&rows);
    let rows = rows
        .into_iter()
        .map(|row| rectangular(row, &columns))
        .collect();
    ImportResult::new(columns, rows, warnings.into_vec())
}

fn into_row(value: Value, position: usize, warnings: &mut Warnings) -> Row {
    match value {
        Value::Object(map) => map,
        other => {
            warnings.push(format!(
                "Item {} is not an object; stored under \"value\"",
                position
            ));
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Follows a dotted path through objects (and numeric segments through arrays).
fn resolve_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(document, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn pretty_export_with_indent() {
        let rows = vec![row(json!({"a": 1}))];
        assert_eq!(
            to_json(&rows, &JsonExportOptions::default()).unwrap(),
            "[\n  {\n    \"a\": 1\n  }\n]"
        );
        assert_eq!(
            to_json(&rows, &JsonExportOptions::new().indent(4)).unwrap(),
            "[\n    {\n        \"a\": 1\n    }\n]"
        );
        assert_eq!(to_json(&[], &JsonExportOptions::default()).unwrap(), "[]");
    }

    #[test]
    fn export_projects_columns_and_unwraps() {
        let rows = vec![row(json!({
            "_id": {"$oid": "507f1f77bcf86cd799439011"},
            "at": {"$date": "2024-05-01T08:00:00Z"},
            "skip": 1
        }))];
        let options = JsonExportOptions::new().pretty(false).columns(["at", "_id", "missing"]);
        assert_eq!(
            to_json(&rows, &options).unwrap(),
            r#"[{"at":"2024-05-01T08:00:00.000Z","_id":"507f1f77bcf86cd799439011","missing":null}]"#
        );
    }

    #[test]
    fn ndjson_export() {
        let rows = vec![row(json!({"a": 1})), row(json!({"a": 2}))];
        assert_eq!(to_ndjson(&rows, None).unwrap(), "{\"a\":1}\n{\"a\":2}\n");
        assert_eq!(to_ndjson(&[], None).unwrap(), "");
    }

    #[test]
    fn import_shapes() {
        let single = parse_json(r#"{"a": 1}"#, &JsonImportOptions::default()).unwrap();
        assert_eq!(single.rows, vec![row(json!({"a": 1}))]);

        let mixed = parse_json(r#"[{"a": 1}, 2, {"b": 3}]"#, &JsonImportOptions::default()).unwrap();
        assert_eq!(mixed.columns, ["a", "value", "b"]);
        assert_eq!(mixed.rows[1], row(json!({"a": null, "value": 2, "b": null})));
        assert_eq!(mixed.warnings.len(), 1);
    }

    #[test]
    fn malformed_json_is_a_warning() {
        let result = parse_json("{not json", &JsonImportOptions::default()).unwrap();
        assert_eq!(result.row_count, 0);
        assert!(result.warnings[0].starts_with("Invalid JSON"));
    }

    #[test]
    fn data_path_errors() {
        let input = r#"{"data": {"items": {"a": 1}}, "list": [[{"x": 1}]]}"#;
        let not_array = parse_json(input, &JsonImportOptions::new().data_path("data.items"));
        assert!(matches!(not_array, Err(CodecError::DataPathNotArray(p)) if p == "data.items"));

        let missing = parse_json(input, &JsonImportOptions::new().data_path("data.nope"));
        assert!(matches!(missing, Err(CodecError::DataPathNotFound(_))));

        let indexed = parse_json(input, &JsonImportOptions::new().data_path("list.0")).unwrap();
        assert_eq!(indexed.rows, vec![row(json!({"x": 1}))]);

        let blank = parse_json(r#"[{"a": 1}]"#, &JsonImportOptions::new().data_path(" ")).unwrap();
        assert_eq!(blank.row_count, 1);
    }

    #[test]
    fn ndjson_import() {
        let input = "{\"a\": 1}\n\n{oops}\n[1]\n{\"a\": 2, \"b\": true}\n";
        let result = parse_ndjson(input);
        assert_eq!(result.columns, ["a", "value", "b"]);
        assert_eq!(result.row_count, 3);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].starts_with("Line 3"));
    }
}
