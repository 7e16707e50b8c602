// libSQL binding over the libsql crate.
//
// - config: local/remote options and the fluent builder
// - params: parameter conversion into libsql values
// - query: row extraction and result building
// - connector: the lazily opened database and the Connector impl

pub mod config;
pub mod connector;
pub mod params;
pub mod query;

pub use config::{LibsqlOptions, LibsqlOptionsBuilder, LibsqlTarget};
pub use connector::{LibsqlConnector, LibsqlHandle};
