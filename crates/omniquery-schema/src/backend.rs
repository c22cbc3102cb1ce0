//! Backend type tags.
//!
//! The UI hands every dialect-sensitive operation a backend tag string. That
//! tag is parsed once into [`BackendType`], a closed enum, and everything
//! downstream matches on it (or on its [`BackendFamily`]) exhaustively.

use serde::{Deserialize, Serialize};

use crate::flavor::SqlFlavor;

/// A storage engine the tool can connect to.
///
/// Parsing is total: tags that are not recognized become
/// [`BackendType::Unknown`] so callers never crash on a new or misspelled tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackendType {
    #[default]
    Postgres,
    MySql,
    MariaDb,
    Sqlite,
    SqlServer,
    Oracle,
    CockroachDb,
    MongoDb,
    DocumentDb,
    CouchDb,
    Cassandra,
    ScyllaDb,
    Redis,
    /// Any tag not listed above.
    Unknown,
}

/// Broad category of a backend, used to pick a filter compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendFamily {
    /// SQL databases.
    Relational,
    /// Document stores with a nested predicate query language.
    Document,
    /// Wide-column stores speaking CQL.
    WideColumn,
    /// Key-value stores with no server-side predicate language.
    KeyValue,
    /// Unrecognized backend.
    Unknown,
}

impl BackendType {
    /// All known backends, in declaration order.
    pub const ALL: [BackendType; 13] = [
        BackendType::Postgres,
        BackendType::MySql,
        BackendType::MariaDb,
        BackendType::Sqlite,
        BackendType::SqlServer,
        BackendType::Oracle,
        BackendType::CockroachDb,
        BackendType::MongoDb,
        BackendType::DocumentDb,
        BackendType::CouchDb,
        BackendType::Cassandra,
        BackendType::ScyllaDb,
        BackendType::Redis,
    ];

    /// Parses a backend tag. Case-insensitive, accepts common aliases.
    ///
    /// ```
    /// use omniquery_schema::BackendType;
    ///
    /// assert_eq!(BackendType::from_tag("postgresql"), BackendType::Postgres);
    /// assert_eq!(BackendType::from_tag("Mongo"), BackendType::MongoDb);
    /// assert_eq!(BackendType::from_tag("neo4j"), BackendType::Unknown);
    /// ```
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => BackendType::Postgres,
            "mysql" => BackendType::MySql,
            "mariadb" => BackendType::MariaDb,
            "sqlite" | "sqlite3" => BackendType::Sqlite,
            "sqlserver" | "mssql" | "sql_server" => BackendType::SqlServer,
            "oracle" => BackendType::Oracle,
            "cockroachdb" | "cockroach" => BackendType::CockroachDb,
            "mongodb" | "mongo" => BackendType::MongoDb,
            "documentdb" => BackendType::DocumentDb,
            "couchdb" | "couch" => BackendType::CouchDb,
            "cassandra" => BackendType::Cassandra,
            "scylladb" | "scylla" => BackendType::ScyllaDb,
            "redis" => BackendType::Redis,
            _ => BackendType::Unknown,
        }
    }

    /// Returns the canonical tag for this backend.
    pub fn as_str(self) -> &'static str {
        match self {
            BackendType::Postgres => "postgres",
            BackendType::MySql => "mysql",
            BackendType::MariaDb => "mariadb",
            BackendType::Sqlite => "sqlite",
            BackendType::SqlServer => "sqlserver",
            BackendType::Oracle => "oracle",
            BackendType::CockroachDb => "cockroachdb",
            BackendType::MongoDb => "mongodb",
            BackendType::DocumentDb => "documentdb",
            BackendType::CouchDb => "couchdb",
            BackendType::Cassandra => "cassandra",
            BackendType::ScyllaDb => "scylladb",
            BackendType::Redis => "redis",
            BackendType::Unknown => "unknown",
        }
    }

    /// Returns the family this backend belongs to.
    pub fn family(self) -> BackendFamily {
        match self {
            BackendType::Postgres
            | BackendType::MySql
            | BackendType::MariaDb
            | BackendType::Sqlite
            | BackendType::SqlServer
            | BackendType::Oracle
            | BackendType::CockroachDb => BackendFamily::Relational,
            BackendType::MongoDb | BackendType::DocumentDb | BackendType::CouchDb => {
                BackendFamily::Document
            }
            BackendType::Cassandra | BackendType::ScyllaDb => BackendFamily::WideColumn,
            BackendType::Redis => BackendFamily::KeyValue,
            BackendType::Unknown => BackendFamily::Unknown,
        }
    }

    /// Returns the SQL flavor used to quote identifiers and values.
    ///
    /// Backends that don't speak SQL fall back to [`SqlFlavor::Ansi`].
    pub fn sql_flavor(self) -> SqlFlavor {
        match self {
            BackendType::Postgres | BackendType::CockroachDb => SqlFlavor::Postgres,
            BackendType::MySql | BackendType::MariaDb => SqlFlavor::MySql,
            BackendType::Sqlite => SqlFlavor::Sqlite,
            BackendType::SqlServer => SqlFlavor::SqlServer,
            BackendType::Oracle => SqlFlavor::Oracle,
            BackendType::MongoDb
            | BackendType::DocumentDb
            | BackendType::CouchDb
            | BackendType::Cassandra
            | BackendType::ScyllaDb
            | BackendType::Redis
            | BackendType::Unknown => SqlFlavor::Ansi,
        }
    }

    /// Returns `true` if statements for this backend are SQL text.
    ///
    /// Unknown backends are treated as SQL, like [`sql_flavor`](Self::sql_flavor)
    /// treats them as ANSI.
    pub fn speaks_sql(self) -> bool {
        matches!(
            self.family(),
            BackendFamily::Relational | BackendFamily::Unknown
        )
    }
}

impl From<String> for BackendType {
    fn from(tag: String) -> Self {
        BackendType::from_tag(&tag)
    }
}

impl From<&str> for BackendType {
    fn from(tag: &str) -> Self {
        BackendType::from_tag(tag)
    }
}

impl From<BackendType> for String {
    fn from(backend: BackendType) -> Self {
        backend.as_str().to_string()
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
