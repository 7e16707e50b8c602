// PostgreSQL binding over tokio-postgres.
//
// - config: connection options and the fluent builder
// - params: `ToSql` for `RowValues`, driven by the server-side parameter type
// - query: row extraction and result building
// - connector: the lazily connected client and the Connector impl

pub mod config;
pub mod connector;
pub mod params;
pub mod query;

pub use config::{PostgresOptions, PostgresOptionsBuilder};
pub use connector::PostgresConnector;
