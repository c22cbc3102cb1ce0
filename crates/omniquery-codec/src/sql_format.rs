//! One-clause-per-line layout for SQL scripts.

use omniquery_schema::BackendType;

use crate::split::split_statements;

/// Clauses that start on a new line at the top nesting level.
const CLAUSES: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP", "ORDER", "HAVING", "LIMIT", "OFFSET", "VALUES", "SET",
    "UPDATE", "INSERT", "DELETE", "JOIN", "LEFT", "RIGHT", "INNER", "OUTER", "FULL", "CROSS",
    "UNION", "RETURNING",
];

/// Words that keep the following clause on their line (`LEFT JOIN`, `DELETE FROM`).
const MODIFIERS: &[&str] = &[
    "LEFT", "RIGHT", "INNER", "OUTER", "FULL", "CROSS", "NATURAL", "DELETE",
];

const KEYWORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CREATE", "CROSS", "DEFAULT",
    "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END", "EXISTS", "FALSE", "FROM", "FULL",
    "GROUP", "HAVING", "ILIKE", "IN", "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN", "KEY",
    "LEFT", "LIKE", "LIMIT", "NATURAL", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER",
    "PRIMARY", "RETURNING", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TRUE", "UNION",
    "UPDATE", "VALUES", "WHEN", "WHERE", "WITH",
];

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    /// String literal or quoted identifier, kept verbatim.
    Quoted(&'a str),
    LineComment(&'a str),
    BlockComment(&'a str),
    Space,
    Symbol(char),
}

/// Lays out a SQL script with each major clause on its own line.
///
/// Keywords are uppercased and runs of whitespace collapse to one space;
/// quoted text and comments are left as written. Statements are separated by
/// a blank line. Scripts for backends that do not speak SQL are returned
/// unchanged.
///
/// ```
/// use omniquery_codec::format_sql;
/// use omniquery_schema::BackendType;
///
/// let sql = "select id, name from users u left join orders o on o.user_id = u.id where name = 'a  b'";
/// assert_eq!(
///     format_sql(sql, BackendType::Postgres),
///     "SELECT id, name\nFROM users u\nLEFT JOIN orders o ON o.user_id = u.id\nWHERE name = 'a  b'"
/// );
/// assert_eq!(format_sql("db.users.find({})", BackendType::MongoDb), "db.users.find({})");
/// ```
pub fn format_sql(script: &str, backend: BackendType) -> String {
    if !backend.speaks_sql() {
        tracing::debug!(backend = backend.as_str(), "not formatting non-SQL script");
        return script.to_string();
    }

    let formatted: Vec<String> = split_statements(script)
        .iter()
        .map(|s| format_statement(s))
        .collect();
    let mut out = formatted.join(";\n\n");
    if !out.is_empty() && script.trim_end().ends_with(';') {
        out.push(';');
    }
    out
}

fn format_statement(statement: &str) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    let mut previous_word: Option<String> = None;
    let mut pending_space = false;
    let mut after_line_comment = false;

    for token in tokenize(statement) {
        if token == Token::Space {
            pending_space = !out.is_empty();
            continue;
        }
        if after_line_comment {
            out.push('\n');
            pending_space = false;
            after_line_comment = false;
        }

        let text = match token {
            Token::Word(word) => {
                let upper = word.to_ascii_uppercase();
                let is_keyword = KEYWORDS.contains(&upper.as_str());
                let breaks = depth == 0
                    && !out.is_empty()
                    && !out.ends_with('\n')
                    && CLAUSES.contains(&upper.as_str())
                    && !previous_word
                        .as_deref()
                        .is_some_and(|prev| MODIFIERS.contains(&prev));
                if breaks {
                    trim_trailing_spaces(&mut out);
                    out.push('\n');
                    pending_space = false;
                }
                let text = if is_keyword { upper.clone() } else { word.to_string() };
                previous_word = Some(upper);
                text
            }
            Token::Quoted(text) | Token::BlockComment(text) => text.to_string(),
            Token::LineComment(text) => {
                after_line_comment = true;
                text.trim_end().to_string()
            }
            Token::Symbol(c) => {
                match c {
                    '(' => depth += 1,
                    ')' => depth = depth.saturating_sub(1),
                    _ => {}
                }
                previous_word = None;
                c.to_string()
            }
            Token::Space => unreachable!("handled above"),
        };

        if pending_space && !out.ends_with('\n') {
            out.push(' ');
        }
        pending_space = false;
        out.push_str(&text);
    }

    // Keep a trailing line comment from swallowing the separator.
    if after_line_comment {
        out.push('\n');
    }
    out
}

fn trim_trailing_spaces(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
}

fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let bytes = sql.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < sql.len() {
        let rest = &sql[i..];
        let c = rest.chars().next().unwrap_or(' ');
        let end = if c.is_whitespace() {
            let len = rest
                .find(|ch: char| !ch.is_whitespace())
                .unwrap_or(rest.len());
            tokens.push(Token::Space);
            i + len
        } else if rest.starts_with("--") {
            let len = rest.find('\n').unwrap_or(rest.len());
            tokens.push(Token::LineComment(&rest[..len]));
            i + len
        } else if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map_or(rest.len(), |p| p + 4);
            tokens.push(Token::BlockComment(&rest[..len]));
            i + len
        } else if matches!(c, '\'' | '"' | '`' | '[') {
            let close = if c == '[' { b']' } else { c as u8 };
            let len = quoted_len(&bytes[i..], close);
            tokens.push(Token::Quoted(&rest[..len]));
            i + len
        } else if is_word_char(c) {
            let len = rest
                .find(|ch: char| !is_word_char(ch))
                .unwrap_or(rest.len());
            tokens.push(Token::Word(&rest[..len]));
            i + len
        } else {
            tokens.push(Token::Symbol(c));
            i + c.len_utf8()
        };
        i = end;
    }
    tokens
}

/// Byte length of a quoted run starting at `bytes[0]`, through its closing
/// delimiter. Backslash escapes the next byte; a doubled delimiter is text.
fn quoted_len(bytes: &[u8], close: u8) -> usize {
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if close != b']' => i += 2,
            b if b == close => {
                if bytes.get(i + 1) == Some(&close) && close != b']' {
                    i += 2;
                } else {
                    return i + 1;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '@' | '#')
}
