//! SQL INSERT script generation.

use omniquery_document::normalize_value;
use omniquery_schema::SqlFlavor;
use serde_json::Value;

use crate::error::{CodecError, Result};
use crate::import::Row;
use crate::options::SqlExportOptions;

/// Writes rows as INSERT statements for the target backend.
///
/// Identifiers are quoted per flavor. With `batch_size > 1`, up to that many
/// rows share one multi-row INSERT. An empty row set or column list yields an
/// empty script.
///
/// ```
/// use omniquery_codec::{to_sql, SqlExportOptions};
/// use omniquery_schema::BackendType;
/// use serde_json::json;
///
/// let rows = vec![json!({"id": 1, "name": "O'Brien", "vip": true}).as_object().unwrap().clone()];
/// let columns = vec!["id".to_string(), "name".to_string(), "vip".to_string()];
/// let options = SqlExportOptions::new("users").db_type(BackendType::MySql);
/// assert_eq!(
///     to_sql(&rows, &columns, &options).unwrap(),
///     "INSERT INTO `users` (`id`, `name`, `vip`) VALUES (1, 'O''Brien', 1);"
/// );
/// ```
pub fn to_sql(rows: &[Row], columns: &[String], options: &SqlExportOptions) -> Result<String> {
    if options.table.trim().is_empty() {
        return Err(CodecError::MissingTable);
    }
    if columns.is_empty() {
        return Ok(String::new());
    }
    let flavor = options.db_type.sql_flavor();
    let target = flavor.quote_qualified(&options.schema, &options.table);
    let column_list = if options.include_columns {
        let quoted: Vec<String> = columns.iter().map(|c| flavor.quote_identifier(c)).collect();
        format!(" ({})", quoted.join(", "))
    } else {
        String::new()
    };
    let head = format!("INSERT INTO {}{} VALUES", target, column_list);

    let tuples: Vec<String> = rows
        .iter()
        .map(|row| {
            let values: Vec<String> = columns
                .iter()
                .map(|c| sql_literal(row.get(c).unwrap_or(&Value::Null), flavor))
                .collect();
            format!("({})", values.join(", "))
        })
        .collect();

    let batch_size = options.batch_size.max(1);
    let statements: Vec<String> = if batch_size == 1 {
        tuples.iter().map(|t| format!("{} {};", head, t)).collect()
    } else {
        tuples
            .chunks(batch_size)
            .map(|chunk| format!("{}\n  {};", head, chunk.join(",\n  ")))
            .collect()
    };
    Ok(statements.join("\n"))
}

/// Renders a value as a SQL literal.
///
/// Non-finite numbers (only representable through extended JSON such as
/// `{"$numberDouble": "NaN"}`) become `NULL`. Objects and arrays are
/// written as quoted JSON text.
pub fn sql_literal(value: &Value, flavor: SqlFlavor) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => flavor.boolean_literal(*b).to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !f.is_finite() => "NULL".to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => quote_string(s, flavor),
        Value::Array(_) | Value::Object(_) => {
            if is_non_finite_wrapper(value) {
                return "NULL".to_string();
            }
            match normalize_value(value) {
                Value::String(s) => quote_string(&s, flavor),
                Value::Number(n) => n.to_string(),
                other => quote_string(&other.to_string(), flavor),
            }
        }
    }
}

fn quote_string(s: &str, flavor: SqlFlavor) -> String {
    let escaped = if flavor.escapes_backslash_in_strings() {
        s.replace('\\', "\\\\").replace('\'', "''")
    } else {
        s.replace('\'', "''")
    };
    format!("'{}'", escaped)
}

fn is_non_finite_wrapper(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    if map.len() != 1 {
        return false;
    }
    ["$numberDouble", "$numberDecimal"].iter().any(|key| {
        map.get(*key)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<f64>().ok())
            .is_some_and(|f| !f.is_finite())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniquery_schema::BackendType;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap_or_default()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn requires_table() {
        let result = to_sql(&[], &[], &SqlExportOptions::default());
        assert!(matches!(result, Err(CodecError::MissingTable)));
    }

    #[test]
    fn postgres_with_schema() {
        let rows = vec![row(json!({"id": 1, "active": false, "note": null}))];
        let options = SqlExportOptions::new("events").schema("audit");
        assert_eq!(
            to_sql(&rows, &columns(&["id", "active", "note"]), &options).unwrap(),
            "INSERT INTO \"audit\".\"events\" (\"id\", \"active\", \"note\") VALUES (1, FALSE, NULL);"
        );
    }

    #[test]
    fn batches() {
        let rows: Vec<Row> = (1..=3).map(|i| row(json!({"n": i}))).collect();
        let options = SqlExportOptions::new("t")
            .db_type(BackendType::Sqlite)
            .include_columns(false)
            .batch_size(2);
        assert_eq!(
            to_sql(&rows, &columns(&["n"]), &options).unwrap(),
            "INSERT INTO \"t\" VALUES\n  (1),\n  (2);\nINSERT INTO \"t\" VALUES\n  (3);"
        );
    }

    #[test]
    fn one_statement_per_row_by_default() {
        let rows = vec![row(json!({"n": 1})), row(json!({"n": 2}))];
        let options = SqlExportOptions::new("t").db_type(BackendType::SqlServer);
        assert_eq!(
            to_sql(&rows, &columns(&["n"]), &options).unwrap(),
            "INSERT INTO [t] ([n]) VALUES (1);\nINSERT INTO [t] ([n]) VALUES (2);"
        );
        assert_eq!(to_sql(&[], &columns(&["n"]), &options).unwrap(), "");
    }

    #[test]
    fn no_columns_no_statements() {
        let rows = vec![row(json!({"n": 1})), row(json!({"n": 2}))];
        let options = SqlExportOptions::new("t");
        assert_eq!(to_sql(&rows, &[], &options).unwrap(), "");
        assert_eq!(to_sql(&rows, &[], &options.include_columns(false)).unwrap(), "");
    }

    #[test]
    fn literals() {
        let pg = SqlFlavor::Postgres;
        assert_eq!(sql_literal(&json!("it's"), pg), "'it''s'");
        assert_eq!(sql_literal(&json!("a\\b"), pg), "'a\\b'");
        assert_eq!(sql_literal(&json!("a\\b"), SqlFlavor::MySql), "'a\\\\b'");
        assert_eq!(sql_literal(&json!(true), pg), "TRUE");
        assert_eq!(sql_literal(&json!(true), SqlFlavor::Sqlite), "1");
        assert_eq!(sql_literal(&json!(2.5), pg), "2.5");
        assert_eq!(sql_literal(&json!({"k": "v'"}), pg), "'{\"k\":\"v''\"}'");
        assert_eq!(sql_literal(&json!([1, 2]), pg), "'[1,2]'");
        assert_eq!(
            sql_literal(&json!({"$date": "2024-01-01T00:00:00Z"}), pg),
            "'2024-01-01T00:00:00.000Z'"
        );
        assert_eq!(sql_literal(&json!({"$numberDouble": "NaN"}), pg), "NULL");
        assert_eq!(sql_literal(&json!({"$numberDouble": "-Infinity"}), pg), "NULL");
        assert_eq!(sql_literal(&json!({"$numberLong": "9"}), pg), "9");
    }
}
