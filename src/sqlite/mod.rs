// SQLite binding over rusqlite.
//
// - config: options, path resolution and the fluent builder
// - params: parameter conversion into rusqlite values
// - query: row extraction and result building
// - connector: the lazily opened handle and the Connector impl

pub mod config;
pub mod connector;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connector::{SqliteConnector, SqliteHandle};
