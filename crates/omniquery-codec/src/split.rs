//! Splitting SQL scripts into statements.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// Splits a script on `;` separators that sit outside quotes and comments.
///
/// Statements are trimmed and the separator is dropped. Chunks holding only
/// whitespace or comments are discarded. Inside a quoted string, a backslash
/// escapes the next character and a doubled quote stays in the string.
///
/// ```
/// use omniquery_codec::split_statements;
///
/// let script = "INSERT INTO t VALUES ('a;b'); -- done;\nSELECT 1;";
/// assert_eq!(
///     split_statements(script),
///     ["INSERT INTO t VALUES ('a;b')", "-- done;\nSELECT 1"]
/// );
/// ```
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_code = false;
    let mut mode = Mode::Normal;
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        match mode {
            Mode::Normal => match c {
                ';' => {
                    flush(&mut statements, &mut current, has_code);
                    has_code = false;
                    continue;
                }
                '\'' => {
                    mode = Mode::SingleQuoted;
                    has_code = true;
                }
                '"' => {
                    mode = Mode::DoubleQuoted;
                    has_code = true;
                }
                '-' if chars.peek() == Some(&'-') => {
                    mode = Mode::LineComment;
                    current.push(c);
                    current.extend(chars.next());
                    continue;
                }
                '/' if chars.peek() == Some(&'*') => {
                    mode = Mode::BlockComment;
                    current.push(c);
                    current.extend(chars.next());
                    continue;
                }
                c if !c.is_whitespace() => has_code = true,
                _ => {}
            },
            Mode::SingleQuoted | Mode::DoubleQuoted => {
                let quote = if mode == Mode::SingleQuoted { '\'' } else { '"' };
                if c == '\\' {
                    current.push(c);
                    current.extend(chars.next());
                    continue;
                }
                if c == quote {
                    mode = Mode::Normal;
                }
            }
            Mode::LineComment => {
                if c == '\n' {
                    mode = Mode::Normal;
                }
            }
            Mode::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    mode = Mode::Normal;
                    current.push(c);
                    current.extend(chars.next());
                    continue;
                }
            }
        }
        current.push(c);
    }
    flush(&mut statements, &mut current, has_code);
    statements
}

fn flush(statements: &mut Vec<String>, current: &mut String, has_code: bool) {
    let statement = current.trim();
    if has_code && !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}
