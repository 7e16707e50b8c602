//! Connector resolution table.
//!
//! Every connector name maps to one binding. Some names are aliases
//! (`bun`, `libsql`, `sqlite`); several names share one native backend.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::any::AnyConnector;
use crate::error::SqlConnectorError;
use crate::types::Dialect;

/// Canonical connector names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(try_from = "String")]
pub enum ConnectorName {
    #[value(name = "better-sqlite3")]
    BetterSqlite3,
    #[value(name = "bun-sqlite", alias = "bun")]
    BunSqlite,
    #[value(name = "cloudflare-d1")]
    CloudflareD1,
    #[value(name = "cloudflare-hyperdrive-mysql")]
    CloudflareHyperdriveMysql,
    #[value(name = "cloudflare-hyperdrive-postgresql")]
    CloudflareHyperdrivePostgresql,
    #[value(name = "libsql-core")]
    LibsqlCore,
    #[value(name = "libsql-http")]
    LibsqlHttp,
    #[value(name = "libsql-node", alias = "libsql")]
    LibsqlNode,
    #[value(name = "libsql-web")]
    LibsqlWeb,
    #[value(name = "mssql")]
    Mssql,
    #[value(name = "mysql2")]
    Mysql2,
    #[value(name = "node-sqlite", alias = "sqlite")]
    NodeSqlite,
    #[value(name = "pglite")]
    Pglite,
    #[value(name = "planetscale")]
    Planetscale,
    #[value(name = "postgresql")]
    Postgresql,
    #[value(name = "sqlite3")]
    Sqlite3,
}

/// Every accepted name, aliases included, and the binding it resolves to.
pub const CONNECTORS: [(&str, &str); 19] = [
    ("better-sqlite3", "connectors/better-sqlite3"),
    ("bun-sqlite", "connectors/bun-sqlite"),
    ("bun", "connectors/bun-sqlite"),
    ("cloudflare-d1", "connectors/cloudflare-d1"),
    ("cloudflare-hyperdrive-mysql", "connectors/cloudflare-hyperdrive-mysql"),
    (
        "cloudflare-hyperdrive-postgresql",
        "connectors/cloudflare-hyperdrive-postgresql",
    ),
    ("libsql-core", "connectors/libsql/core"),
    ("libsql-http", "connectors/libsql/http"),
    ("libsql-node", "connectors/libsql/node"),
    ("libsql", "connectors/libsql/node"),
    ("libsql-web", "connectors/libsql/web"),
    ("mssql", "connectors/mssql"),
    ("mysql2", "connectors/mysql2"),
    ("node-sqlite", "connectors/node-sqlite"),
    ("sqlite", "connectors/node-sqlite"),
    ("pglite", "connectors/pglite"),
    ("planetscale", "connectors/planetscale"),
    ("postgresql", "connectors/postgresql"),
    ("sqlite3", "connectors/sqlite3"),
];

/// Native driver family behind a connector name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Sqlite,
    Libsql,
    Postgres,
    Mysql,
    Mssql,
    /// Only exists inside a JavaScript host.
    Unavailable,
}

impl Backend {
    /// Cargo feature that compiles this backend in.
    #[must_use]
    pub fn feature(self) -> Option<&'static str> {
        match self {
            Backend::Sqlite => Some("sqlite"),
            Backend::Libsql => Some("libsql"),
            Backend::Postgres => Some("postgres"),
            Backend::Mysql => Some("mysql"),
            Backend::Mssql => Some("mssql"),
            Backend::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        match self {
            Backend::Sqlite => cfg!(feature = "sqlite"),
            Backend::Libsql => cfg!(feature = "libsql"),
            Backend::Postgres => cfg!(feature = "postgres"),
            Backend::Mysql => cfg!(feature = "mysql"),
            Backend::Mssql => cfg!(feature = "mssql"),
            Backend::Unavailable => false,
        }
    }
}

impl ConnectorName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectorName::BetterSqlite3 => "better-sqlite3",
            ConnectorName::BunSqlite => "bun-sqlite",
            ConnectorName::CloudflareD1 => "cloudflare-d1",
            ConnectorName::CloudflareHyperdriveMysql => "cloudflare-hyperdrive-mysql",
            ConnectorName::CloudflareHyperdrivePostgresql => "cloudflare-hyperdrive-postgresql",
            ConnectorName::LibsqlCore => "libsql-core",
            ConnectorName::LibsqlHttp => "libsql-http",
            ConnectorName::LibsqlNode => "libsql-node",
            ConnectorName::LibsqlWeb => "libsql-web",
            ConnectorName::Mssql => "mssql",
            ConnectorName::Mysql2 => "mysql2",
            ConnectorName::NodeSqlite => "node-sqlite",
            ConnectorName::Pglite => "pglite",
            ConnectorName::Planetscale => "planetscale",
            ConnectorName::Postgresql => "postgresql",
            ConnectorName::Sqlite3 => "sqlite3",
        }
    }

    #[must_use]
    pub fn dialect(self) -> Dialect {
        match self {
            ConnectorName::BetterSqlite3
            | ConnectorName::BunSqlite
            | ConnectorName::CloudflareD1
            | ConnectorName::NodeSqlite
            | ConnectorName::Sqlite3 => Dialect::Sqlite,
            ConnectorName::CloudflareHyperdriveMysql
            | ConnectorName::Mysql2
            | ConnectorName::Planetscale => Dialect::Mysql,
            ConnectorName::CloudflareHyperdrivePostgresql
            | ConnectorName::Pglite
            | ConnectorName::Postgresql => Dialect::Postgresql,
            ConnectorName::LibsqlCore
            | ConnectorName::LibsqlHttp
            | ConnectorName::LibsqlNode
            | ConnectorName::LibsqlWeb => Dialect::Libsql,
            ConnectorName::Mssql => Dialect::Mssql,
        }
    }

    #[must_use]
    pub fn backend(self) -> Backend {
        match self {
            ConnectorName::CloudflareD1 | ConnectorName::Pglite => Backend::Unavailable,
            other => match other.dialect() {
                Dialect::Sqlite => Backend::Sqlite,
                Dialect::Mysql => Backend::Mysql,
                Dialect::Postgresql => Backend::Postgres,
                Dialect::Libsql => Backend::Libsql,
                Dialect::Mssql => Backend::Mssql,
            },
        }
    }

    /// Names that only accept a remote server URL.
    #[must_use]
    pub fn is_remote_only(self) -> bool {
        matches!(self, ConnectorName::LibsqlHttp | ConnectorName::LibsqlWeb)
    }

    #[must_use]
    pub fn binding_path(self) -> &'static str {
        resolve_binding(self.as_str()).unwrap_or_default()
    }
}

/// Binding path for any accepted name, aliases included.
#[must_use]
pub fn resolve_binding(name: &str) -> Option<&'static str> {
    CONNECTORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, path)| *path)
}

impl fmt::Display for ConnectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectorName {
    type Err = SqlConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <ConnectorName as ValueEnum>::from_str(s, false)
            .map_err(|_| SqlConnectorError::UnknownConnector(s.to_string()))
    }
}

impl TryFrom<String> for ConnectorName {
    type Error = SqlConnectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn parse_options<T>(options: JsonValue) -> Result<T, SqlConnectorError>
where
    T: serde::de::DeserializeOwned,
{
    let options = if options.is_null() {
        JsonValue::Object(serde_json::Map::new())
    } else {
        options
    };
    Ok(serde_json::from_value(options)?)
}

/// Build the binding for `name` from JSON options.
///
/// `null` options mean "all defaults".
///
/// # Errors
/// `Unimplemented` when the backend is not compiled in or has no native
/// driver, `ConfigError` for options the binding cannot accept.
pub fn create_connector(
    name: ConnectorName,
    options: JsonValue,
) -> Result<AnyConnector, SqlConnectorError> {
    let backend = name.backend();
    tracing::debug!(connector = name.as_str(), ?backend, "resolving connector");
    match backend {
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            let opts: crate::sqlite::SqliteOptions = parse_options(options)?;
            Ok(crate::sqlite::SqliteConnector::named(name.as_str(), opts).into())
        }
        #[cfg(feature = "postgres")]
        Backend::Postgres => {
            let opts: crate::postgres::PostgresOptions = parse_options(options)?;
            Ok(crate::postgres::PostgresConnector::named(name.as_str(), opts).into())
        }
        #[cfg(feature = "libsql")]
        Backend::Libsql => {
            let opts: crate::libsql::LibsqlOptions = parse_options(options)?;
            let connector = if name.is_remote_only() {
                crate::libsql::LibsqlConnector::remote(name.as_str(), opts)?
            } else {
                crate::libsql::LibsqlConnector::named(name.as_str(), opts)
            };
            Ok(connector.into())
        }
        #[cfg(feature = "mysql")]
        Backend::Mysql => {
            let opts: crate::mysql::MysqlOptions = parse_options(options)?;
            Ok(crate::mysql::MysqlConnector::named(name.as_str(), opts).into())
        }
        #[cfg(feature = "mssql")]
        Backend::Mssql => {
            let opts: crate::mssql::MssqlOptions = parse_options(options)?;
            Ok(crate::mssql::MssqlConnector::new(opts).into())
        }
        Backend::Unavailable => Err(SqlConnectorError::Unimplemented(format!(
            "connector {name} has no native Rust driver"
        ))),
        #[allow(unreachable_patterns)]
        other => Err(SqlConnectorError::Unimplemented(format!(
            "connector {name} needs the `{}` feature",
            other.feature().unwrap_or_default()
        ))),
    }
}

/// [`create_connector`] keyed by a string name, aliases included.
///
/// # Errors
/// `UnknownConnector` for a name not in [`CONNECTORS`], otherwise as
/// [`create_connector`].
pub fn create_connector_by_name(
    name: &str,
    options: JsonValue,
) -> Result<AnyConnector, SqlConnectorError> {
    create_connector(name.parse()?, options)
}
