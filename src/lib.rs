//! One async `Database` facade over several SQL drivers.
//!
//! A [`Database`] wraps exactly one [`Connector`]. Queries are written as
//! templates whose interpolations become positional `?` parameters; the
//! facade routes `SELECT` and `RETURNING` statements to row-returning
//! execution and everything else to run execution.
//!
//! ```rust,no_run
//! use sql_connector::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlConnectorError> {
//! let db = create_database(sql_connector::sqlite::SqliteOptions::memory().connector());
//! db.exec("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").await?;
//! let name = "alice";
//! db.sql(sql_template!("INSERT INTO users (name) VALUES (", name, ")")).await?;
//! let res = db.sql(sql_template!("SELECT id, name FROM {", "users", "}")).await?;
//! println!("{}", serde_json::to_string(&res).unwrap_or_default());
//! # Ok(()) }
//! ```
//!
//! Backends are cargo features: `sqlite` and `postgres` (default), `libsql`,
//! `mysql`, `mssql`, or `all-connectors`.

#[cfg(not(any(
    feature = "sqlite",
    feature = "postgres",
    feature = "libsql",
    feature = "mysql",
    feature = "mssql"
)))]
compile_error!(
    "enable at least one backend feature: sqlite, postgres, libsql, mysql, or mssql"
);

pub mod any;
pub mod config;
pub mod connector;
pub mod database;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod results;
pub mod statement;
pub mod template;
pub mod translation;
pub mod types;

#[cfg(feature = "libsql")]
pub mod libsql;
pub mod mssql;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use any::{AnyConnector, AnyInstance};
pub use config::DatabaseConfig;
pub use connector::{Connector, LazyHandle};
pub use database::{Database, DatabaseGuard, StatementKind, classify, create_database};
pub use error::{DISPOSED_MESSAGE, SqlConnectorError};
pub use registry::{
    Backend, CONNECTORS, ConnectorName, create_connector, create_connector_by_name,
    resolve_binding,
};
pub use results::{CustomDbRow, ResultSet, RunResult, SqlResult};
pub use statement::{Statement, StatementExecutor};
pub use template::{CompiledSql, SqlTemplate, TemplateBuilder};
pub use translation::{PlaceholderStyle, number_placeholders};
pub use types::{Dialect, RowValues};
