//! Runtime connector selection from JSON.
//!
//! ```rust,no_run
//! use sql_connector::DatabaseConfig;
//!
//! # async fn demo() -> Result<(), sql_connector::SqlConnectorError> {
//! let config = DatabaseConfig::from_json(r#"{ "connector": "sqlite", "options": { "name": ":memory:" } }"#)?;
//! let db = config.build()?;
//! db.exec("CREATE TABLE t (id INTEGER)").await?;
//! # Ok(()) }
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::any::AnyConnector;
use crate::database::Database;
use crate::error::SqlConnectorError;
use crate::registry::{ConnectorName, create_connector};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub connector: ConnectorName,
    /// Binding options; `null` or missing means defaults.
    #[serde(default)]
    pub options: JsonValue,
}

impl DatabaseConfig {
    #[must_use]
    pub fn new(connector: ConnectorName, options: JsonValue) -> Self {
        Self { connector, options }
    }

    /// # Errors
    /// `ConfigError` for malformed JSON, `UnknownConnector` for a bad name.
    pub fn from_json(text: &str) -> Result<Self, SqlConnectorError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        Ok(Self {
            connector: raw.connector.parse()?,
            options: raw.options,
        })
    }

    /// Read a JSON config file.
    ///
    /// # Errors
    /// `ConfigError` when the file cannot be read, otherwise as [`DatabaseConfig::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SqlConnectorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            SqlConnectorError::ConfigError(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// # Errors
    /// Whatever [`create_connector`] fails with.
    pub fn connector(&self) -> Result<AnyConnector, SqlConnectorError> {
        create_connector(self.connector, self.options.clone())
    }

    /// # Errors
    /// Whatever [`create_connector`] fails with.
    pub fn build(&self) -> Result<Database<AnyConnector>, SqlConnectorError> {
        Ok(Database::new(self.connector()?))
    }
}

/// Same shape with the name left unparsed, so a bad name keeps its own error.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    connector: String,
    #[serde(default)]
    options: JsonValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_options() {
        let config =
            DatabaseConfig::from_json(r#"{"connector": "libsql", "options": {"url": "file:x.db"}}"#)
                .unwrap();
        assert_eq!(config.connector, ConnectorName::LibsqlNode);
        assert_eq!(config.options["url"], "file:x.db");
    }

    #[test]
    fn options_default_to_null() {
        let config = DatabaseConfig::from_json(r#"{"connector": "pglite"}"#).unwrap();
        assert!(config.options.is_null());
        assert!(matches!(
            config.build(),
            Err(SqlConnectorError::Unimplemented(_))
        ));
    }

    #[test]
    fn unknown_connector_is_reported_by_name() {
        let err = DatabaseConfig::from_json(r#"{"connector": "oracle"}"#).unwrap_err();
        match err {
            SqlConnectorError::UnknownConnector(name) => assert_eq!(name, "oracle"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            DatabaseConfig::from_json("{"),
            Err(SqlConnectorError::ConfigError(_))
        ));
        assert!(matches!(
            DatabaseConfig::from_json(r#"{"connector": "mysql2", "extra": 1}"#),
            Err(SqlConnectorError::ConfigError(_))
        ));
    }
}
