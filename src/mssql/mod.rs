// SQL Server binding over tiberius.
//
// - params: `?` to `@N` rewriting and per-value type inference (driver-free)
// - config: connection options and the fluent builder
// - client: raw client creation
// - query: request binding and row extraction
// - connector: the Connector impl with per-call connect-run-close

pub mod params;

#[cfg(feature = "mssql")]
pub mod client;
#[cfg(feature = "mssql")]
pub mod config;
#[cfg(feature = "mssql")]
pub mod connector;
#[cfg(feature = "mssql")]
pub mod query;

pub use params::{PreparedParameter, PreparedSql, TediousType, prepare_sql_parameters, tedious_data_type};

#[cfg(feature = "mssql")]
pub use client::{MssqlClient, create_mssql_client};
#[cfg(feature = "mssql")]
pub use config::{MssqlOptions, MssqlOptionsBuilder};
#[cfg(feature = "mssql")]
pub use connector::{MssqlConnector, MssqlHandle};
