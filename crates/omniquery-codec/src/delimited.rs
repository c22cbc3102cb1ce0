//! Delimited text (CSV) encoding and decoding.

use omniquery_document::format_cell;
use serde_json::Value;

use crate::error::{CodecError, Result};
use crate::import::{ImportResult, Row, Warnings};
use crate::options::{delimiter_byte, CsvExportOptions, CsvImportOptions};

/// Writes rows as CSV, one record per row in `columns` order.
///
/// Nulls and missing keys are written as `null_value`; objects and arrays as
/// compact JSON; extended JSON dates as ISO-8601. Fields are quoted only when
/// they contain the delimiter, a quote or a line break.
///
/// ```
/// use omniquery_codec::{to_csv, CsvExportOptions};
/// use serde_json::json;
///
/// let rows = vec![json!({"id": 1, "name": "Ada, Countess"}).as_object().unwrap().clone()];
/// let columns = vec!["id".to_string(), "name".to_string()];
/// let csv = to_csv(&rows, &columns, &CsvExportOptions::default()).unwrap();
/// assert_eq!(csv, "id,name\n1,\"Ada, Countess\"\n");
/// ```
pub fn to_csv(rows: &[Row], columns: &[String], options: &CsvExportOptions) -> Result<String> {
    if columns.is_empty() {
        return Ok(String::new());
    }
    let terminator = match options.line_ending.as_str() {
        "\r\n" => csv::Terminator::CRLF,
        other => csv::Terminator::Any(other.bytes().next().unwrap_or(b'\n')),
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter_byte(options.delimiter))
        .terminator(terminator)
        .from_writer(vec![]);

    if options.include_headers {
        writer.write_record(columns)?;
    }
    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| {
                row.get(column)
                    .and_then(format_cell)
                    .unwrap_or_else(|| options.null_value.clone())
            })
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CodecError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Parses CSV text into rows of string values.
///
/// Never fails: malformed records, ragged rows and unusable headers are
/// reported as warnings. Physically empty lines are always ignored; lines
/// whose fields are all blank are dropped when `skip_empty_lines` is set.
///
/// ```
/// use omniquery_codec::{parse_csv, CsvImportOptions};
///
/// let result = parse_csv("name,age\nAda, 36\nGrace,85,extra\n", &CsvImportOptions::default());
/// assert_eq!(result.columns, ["name", "age"]);
/// assert_eq!(result.row_count, 2);
/// assert_eq!(result.rows[0]["age"], "36");
/// assert_eq!(result.warnings.len(), 1);
/// ```
pub fn parse_csv(input: &str, options: &CsvImportOptions) -> ImportResult {
    let mut warnings = Warnings::default();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter_byte(options.delimiter))
        .trim(if options.trim_values {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(input.as_bytes());

    // (source line, fields)
    let mut records: Vec<(u64, Vec<String>)> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                let line = record.position().map_or(index as u64 + 1, |p| p.line());
                let fields: Vec<String> = record.iter().map(str::to_string).collect();
                if options.skip_empty_lines && fields.iter().all(|f| f.trim().is_empty()) {
                    continue;
                }
                records.push((line, fields));
            }
            Err(err) => {
                let line = err.position().map_or(index as u64 + 1, |p| p.line());
                warnings.push(format!("Line {} could not be read: {}", line, err));
            }
        }
    }

    let columns = if options.has_headers {
        if records.is_empty() {
            return ImportResult::new(Vec::new(), Vec::new(), warnings.into_vec());
        }
        header_names(records.remove(0).1, &mut warnings)
    } else {
        let width = records.iter().map(|(_, fields)| fields.len()).max().unwrap_or(0);
        (1..=width).map(|i| format!("column_{}", i)).collect()
    };
    build(columns, records, warnings)
}

fn build(
    columns: Vec<String>,
    records: Vec<(u64, Vec<String>)>,
    mut warnings: Warnings,
) -> ImportResult {
    let mut rows = Vec::new();
    for (line, mut fields) in records {
        if fields.len() < columns.len() {
            warnings.push(format!(
                "Line {} has {} fields, expected {}; missing values set to null",
                line,
                fields.len(),
                columns.len()
            ));
        } else if fields.len() > columns.len() {
            warnings.push(format!(
                "Line {} has {} fields, expected {}; extra values dropped",
                line,
                fields.len(),
                columns.len()
            ));
            fields.truncate(columns.len());
        }
        let mut values = fields.into_iter();
        let row: Row = columns
            .iter()
            .map(|column| {
                let value = values.next().map_or(Value::Null, Value::String);
                (column.clone(), value)
            })
            .collect();
        rows.push(row);
    }
    ImportResult::new(columns, rows, warnings.into_vec())
}

/// Makes header names usable as keys: blank names become `column_N`,
/// repeated names get a `_2`, `_3`, ... suffix.
fn header_names(header: Vec<String>, warnings: &mut Warnings) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (index, raw) in header.into_iter().enumerate() {
        let trimmed = raw.trim();
        let mut name = if trimmed.is_empty() {
            let generated = format!("column_{}", index + 1);
            warnings.push(format!(
                "Column {} has no header; named '{}'",
                index + 1,
                generated
            ));
            generated
        } else {
            trimmed.to_string()
        };
        if names.contains(&name) {
            let base = name.clone();
            let mut suffix = 2;
            while names.contains(&name) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            warnings.push(format!(
                "Duplicate header '{}' renamed to '{}'",
                base, name
            ));
        }
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap_or_default()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn export_values() {
        let rows = vec![
            row(json!({"a": null, "b": true, "c": {"x": [1]}, "d": {"$date": "2024-01-01"}})),
            row(json!({"a": "line\nbreak", "b": 1.5})),
        ];
        let csv = to_csv(
            &rows,
            &columns(&["a", "b", "c", "d"]),
            &CsvExportOptions::new().null_value("NULL"),
        )
        .unwrap();
        assert_eq!(
            csv,
            "a,b,c,d\nNULL,true,\"{\"\"x\"\":[1]}\",2024-01-01T00:00:00.000Z\n\"line\nbreak\",1.5,NULL,NULL\n"
        );
    }

    #[test]
    fn export_options() {
        let rows = vec![row(json!({"a": 1, "b": 2}))];
        let options = CsvExportOptions::new()
            .include_headers(false)
            .delimiter(';')
            .line_ending("\r\n");
        assert_eq!(to_csv(&rows, &columns(&["a", "b"]), &options).unwrap(), "1;2\r\n");
        assert_eq!(to_csv(&rows, &[], &options).unwrap(), "");
    }

    #[test]
    fn import_trims_and_skips_blank_rows() {
        let input = "name , city\n\n , \n Ada ,  London \n";
        let result = parse_csv(input, &CsvImportOptions::default());
        assert_eq!(result.columns, ["name", "city"]);
        assert_eq!(result.rows, vec![row(json!({"name": "Ada", "city": "London"}))]);
        assert!(!result.has_warnings());

        let kept = parse_csv(input, &CsvImportOptions::new().skip_empty_lines(false).trim_values(false));
        assert_eq!(kept.columns, ["name", "city"]);
        assert_eq!(kept.row_count, 2);
        assert_eq!(kept.rows[1]["name"], " Ada ");
    }

    #[test]
    fn ragged_rows_are_padded_or_truncated() {
        let result = parse_csv("a,b,c\n1\n1,2,3,4\n", &CsvImportOptions::default());
        assert_eq!(result.rows[0], row(json!({"a": "1", "b": null, "c": null})));
        assert_eq!(result.rows[1], row(json!({"a": "1", "b": "2", "c": "3"})));
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("missing values"));
        assert!(result.warnings[1].contains("extra values"));
    }

    #[test]
    fn warnings_name_source_lines() {
        let result = parse_csv("a,b\n\n , \n1,2,3\n\"x\ny\"\n", &CsvImportOptions::default());
        assert_eq!(result.row_count, 2);
        assert_eq!(
            result.warnings,
            [
                "Line 4 has 3 fields, expected 2; extra values dropped",
                "Line 5 has 1 fields, expected 2; missing values set to null"
            ]
        );
    }

    #[test]
    fn headers_are_repaired() {
        let result = parse_csv("id,,id,id\n1,2,3,4\n", &CsvImportOptions::default());
        assert_eq!(result.columns, ["id", "column_2", "id_2", "id_3"]);
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn headerless_input() {
        let result = parse_csv("1,2\n3,4,5\n", &CsvImportOptions::new().has_headers(false));
        assert_eq!(result.columns, ["column_1", "column_2", "column_3"]);
        assert_eq!(result.rows[0]["column_3"], Value::Null);
        assert_eq!(result.row_count, 2);
    }

    #[test]
    fn empty_input() {
        let result = parse_csv("", &CsvImportOptions::default());
        assert!(result.columns.is_empty());
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn quoted_fields_round_trip() {
        let rows = vec![row(json!({"q": "say \"hi\"", "n": "a,b"}))];
        let cols = columns(&["q", "n"]);
        let csv = to_csv(&rows, &cols, &CsvExportOptions::default()).unwrap();
        let back = parse_csv(&csv, &CsvImportOptions::default());
        assert_eq!(back.columns, cols);
        assert_eq!(back.rows, rows);
    }
}
