//! SQL flavor rules.
//!
//! Relational backends differ in a handful of surface details that matter when
//! generating SQL text:
//! - Identifier quoting (`"name"`, `` `name` ``, `[name]`)
//! - Parameter placeholders (`$1`, `?`, `@p1`, `:1`)
//! - Boolean literals (`TRUE`/`FALSE` vs `1`/`0`)
//! - Backslash handling inside string literals and `LIKE` patterns

/// SQL flavor used for quoting and placeholder generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlFlavor {
    /// PostgreSQL and wire-compatible engines.
    Postgres,
    /// MySQL and MariaDB.
    MySql,
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
    Oracle,
    /// Generic fallback: double-quoted identifiers, `?` placeholders.
    Ansi,
}

impl SqlFlavor {
    /// Returns the flavor name.
    pub fn name(self) -> &'static str {
        match self {
            SqlFlavor::Postgres => "postgres",
            SqlFlavor::MySql => "mysql",
            SqlFlavor::Sqlite => "sqlite",
            SqlFlavor::SqlServer => "sqlserver",
            SqlFlavor::Oracle => "oracle",
            SqlFlavor::Ansi => "ansi",
        }
    }

    /// Quotes a single identifier, doubling any embedded closing quote.
    ///
    /// ```
    /// use omniquery_schema::SqlFlavor;
    ///
    /// assert_eq!(SqlFlavor::Postgres.quote_identifier("user"), "\"user\"");
    /// assert_eq!(SqlFlavor::MySql.quote_identifier("user"), "`user`");
    /// assert_eq!(SqlFlavor::SqlServer.quote_identifier("a]b"), "[a]]b]");
    /// ```
    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            SqlFlavor::MySql => format!("`{}`", name.replace('`', "``")),
            SqlFlavor::SqlServer => format!("[{}]", name.replace(']', "]]")),
            SqlFlavor::Postgres | SqlFlavor::Sqlite | SqlFlavor::Oracle | SqlFlavor::Ansi => {
                format!("\"{}\"", name.replace('"', "\"\""))
            }
        }
    }

    /// Quotes `schema.name`, or just `name` when the schema is empty.
    pub fn quote_qualified(self, schema: &str, name: &str) -> String {
        if schema.trim().is_empty() {
            self.quote_identifier(name)
        } else {
            format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(name)
            )
        }
    }

    /// Generates a parameter placeholder for the given index (1-based).
    ///
    /// - PostgreSQL: `$1`, `$2`, ...
    /// - SQL Server: `@p1`, `@p2`, ...
    /// - Oracle: `:1`, `:2`, ...
    /// - Everything else: `?`
    pub fn placeholder(self, index: usize) -> String {
        match self {
            SqlFlavor::Postgres => format!("${}", index),
            SqlFlavor::SqlServer => format!("@p{}", index),
            SqlFlavor::Oracle => format!(":{}", index),
            SqlFlavor::MySql | SqlFlavor::Sqlite | SqlFlavor::Ansi => "?".to_string(),
        }
    }

    /// Renders a boolean literal.
    pub fn boolean_literal(self, value: bool) -> &'static str {
        match (self, value) {
            (SqlFlavor::MySql | SqlFlavor::Sqlite | SqlFlavor::SqlServer, true) => "1",
            (SqlFlavor::MySql | SqlFlavor::Sqlite | SqlFlavor::SqlServer, false) => "0",
            (_, true) => "TRUE",
            (_, false) => "FALSE",
        }
    }

    /// Returns `true` if backslash is an escape character inside string
    /// literals, so literal backslashes must be doubled.
    pub fn escapes_backslash_in_strings(self) -> bool {
        matches!(self, SqlFlavor::MySql)
    }

    /// Returns the `ESCAPE` suffix needed for backslash-escaped `LIKE`
    /// patterns, or an empty string when backslash is already the default.
    pub fn like_escape_clause(self) -> &'static str {
        match self {
            SqlFlavor::Postgres | SqlFlavor::MySql => "",
            SqlFlavor::Sqlite | SqlFlavor::SqlServer | SqlFlavor::Oracle | SqlFlavor::Ansi => {
                " ESCAPE '\\'"
            }
        }
    }

    /// Returns the case-insensitive pattern match operator.
    ///
    /// Only PostgreSQL has a dedicated `ILIKE`; MySQL, SQLite and SQL Server
    /// compare case-insensitively under their default collations.
    pub fn like_operator(self, negated: bool) -> &'static str {
        match (self, negated) {
            (SqlFlavor::Postgres, false) => "ILIKE",
            (SqlFlavor::Postgres, true) => "NOT ILIKE",
            (_, false) => "LIKE",
            (_, true) => "NOT LIKE",
        }
    }
}
