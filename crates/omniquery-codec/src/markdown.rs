//! GitHub-flavored Markdown tables.

use omniquery_document::format_cell;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::import::Row;
use crate::options::{Align, MarkdownOptions};

/// Renders rows as a Markdown table.
///
/// Column widths come from the header and the (possibly truncated) cells,
/// measured in display columns. Pipes in cells are escaped as `\|` and line
/// breaks become `<br>`, so every row stays on one line. Returns an empty
/// string when there are no columns.
///
/// ```
/// use omniquery_codec::{to_markdown, Align, MarkdownOptions};
/// use serde_json::json;
///
/// let rows = vec![json!({"id": 1, "name": "Ada"}).as_object().unwrap().clone()];
/// let columns = vec!["id".to_string(), "name".to_string()];
/// let options = MarkdownOptions::new().align_column("id", Align::Right);
/// assert_eq!(
///     to_markdown(&rows, &columns, &options),
///     "|   id | name |\n| ---: | :--- |\n|    1 | Ada  |"
/// );
/// ```
pub fn to_markdown(rows: &[Row], columns: &[String], options: &MarkdownOptions) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let header: Vec<String> = columns.iter().map(|c| escape_cell(c)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    let text = row
                        .get(column)
                        .and_then(format_cell)
                        .unwrap_or_else(|| options.null_value.clone());
                    let text = if options.max_column_width > 0 {
                        truncate_to_width(&text, options.max_column_width)
                    } else {
                        text
                    };
                    escape_cell(&text)
                })
                .collect()
        })
        .collect();

    let aligns: Vec<Align> = columns
        .iter()
        .map(|c| options.alignment.for_column(c))
        .collect();
    let widths: Vec<usize> = (0..columns.len())
        .map(|i| {
            let content = body
                .iter()
                .map(|cells| cells[i].width())
                .chain(std::iter::once(header[i].width()))
                .max()
                .unwrap_or(0);
            content.max(min_width(aligns[i]))
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_line(&header, &widths, &aligns));
    let separator: Vec<String> = widths
        .iter()
        .zip(&aligns)
        .map(|(&w, &align)| separator(w, align))
        .collect();
    lines.push(format!("| {} |", separator.join(" | ")));
    for cells in &body {
        lines.push(render_line(cells, &widths, &aligns));
    }
    lines.join("\n")
}

/// Narrowest column that fits its alignment marker (`:---`, `:---:`).
fn min_width(align: Align) -> usize {
    match align {
        Align::Center => 5,
        Align::Left | Align::Right => 4,
    }
}

fn separator(width: usize, align: Align) -> String {
    match align {
        Align::Left => format!(":{}", "-".repeat(width - 1)),
        Align::Right => format!("{}:", "-".repeat(width - 1)),
        Align::Center => format!(":{}:", "-".repeat(width - 2)),
    }
}

fn render_line(cells: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter().zip(aligns))
        .map(|(cell, (&width, &align))| pad(cell, width, align))
        .collect();
    format!("| {} |", padded.join(" | "))
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let gap = width.saturating_sub(text.width());
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(gap)),
        Align::Right => format!("{}{}", " ".repeat(gap), text),
        Align::Center => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
        }
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}

/// Truncates to `max_width` display columns, ending with `…` when cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    // Reserve 1 column for the ellipsis
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap_or_default()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn separator_markers() {
        let cols = columns(&["a"]);
        let rows = vec![row(json!({"a": "x"}))];
        for (align, marker) in [
            (Align::Left, ":---"),
            (Align::Right, "---:"),
            (Align::Center, ":---:"),
        ] {
            let table = to_markdown(&rows, &cols, &MarkdownOptions::new().align(align));
            let line = table.lines().nth(1).unwrap();
            assert_eq!(line, format!("| {} |", marker));
        }
    }

    #[test]
    fn wide_columns_stretch_markers() {
        let table = to_markdown(
            &[row(json!({"title": "hello world"}))],
            &columns(&["title"]),
            &MarkdownOptions::new().align(Align::Center),
        );
        assert_eq!(
            table,
            "|    title    |\n| :---------: |\n| hello world |"
        );
    }

    #[test]
    fn escaping_and_nulls() {
        let rows = vec![row(json!({"a": "x|y", "b": "one\ntwo", "c": null}))];
        let table = to_markdown(
            &rows,
            &columns(&["a", "b", "c"]),
            &MarkdownOptions::new().null_value("-"),
        );
        assert_eq!(
            table.lines().nth(2).unwrap(),
            "| x\\|y | one<br>two | -    |"
        );
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn backslashes_cannot_unescape_pipes() {
        let rows = vec![row(json!({"a": "a\\|b", "b": "c:\\tmp\\"}))];
        let table = to_markdown(&rows, &columns(&["a", "b"]), &MarkdownOptions::new());
        assert_eq!(table.lines().nth(2).unwrap(), "| a\\\\\\|b | c:\\\\tmp\\\\ |");
    }

    #[test]
    fn truncation_respects_display_width() {
        let rows = vec![row(json!({"a": "abcdefghij", "b": "日本語テキスト"}))];
        let table = to_markdown(
            &rows,
            &columns(&["a", "b"]),
            &MarkdownOptions::new().max_column_width(5),
        );
        assert_eq!(table.lines().nth(2).unwrap(), "| abcd… | 日本… |");
    }

    #[test]
    fn truncate_helper() {
        assert_eq!(truncate_to_width("Hello", 10), "Hello");
        assert_eq!(truncate_to_width("Hello World", 6), "Hello…");
        assert_eq!(truncate_to_width("abc", 1), "…");
    }

    #[test]
    fn no_columns() {
        assert_eq!(to_markdown(&[], &[], &MarkdownOptions::default()), "");
    }

    #[test]
    fn header_only() {
        assert_eq!(
            to_markdown(&[], &columns(&["name"]), &MarkdownOptions::default()),
            "| name |\n| :--- |"
        );
    }
}
