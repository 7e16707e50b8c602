// MySQL binding over mysql_async.
//
// - config: connection options and the fluent builder
// - params: parameter conversion into mysql values
// - query: row extraction and result building
// - connector: the lazily opened connection and the Connector impl

pub mod config;
pub mod connector;
pub mod params;
pub mod query;

pub use config::{MysqlOptions, MysqlOptionsBuilder};
pub use connector::MysqlConnector;
