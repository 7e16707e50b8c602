use serde::Deserialize;

use super::connector::PostgresConnector;
use crate::error::SqlConnectorError;

/// Options for connecting to `PostgreSQL`.
///
/// Either a connection `url` (libpq key/value or `postgres://` URI) or the
/// individual fields. When both are present the fields override the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostgresOptions {
    #[serde(alias = "connectionString")]
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "database")]
    pub dbname: Option<String>,
}

impl PostgresOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Resolve into a tokio-postgres config.
    ///
    /// # Errors
    /// Returns `ConfigError` for an unparsable URL or when no host is known.
    pub fn to_pg_config(&self) -> Result<tokio_postgres::Config, SqlConnectorError> {
        let mut config = match &self.url {
            Some(url) => url.parse::<tokio_postgres::Config>().map_err(|e| {
                SqlConnectorError::ConfigError(format!("invalid postgres url: {e}"))
            })?,
            None => tokio_postgres::Config::new(),
        };
        if let Some(host) = &self.host {
            config.host(host);
        }
        if let Some(port) = self.port {
            config.port(port);
        }
        if let Some(user) = &self.user {
            config.user(user);
        }
        if let Some(password) = &self.password {
            config.password(password);
        }
        if let Some(dbname) = &self.dbname {
            config.dbname(dbname);
        }
        if config.get_hosts().is_empty() {
            return Err(SqlConnectorError::ConfigError(
                "host is required".to_string(),
            ));
        }
        Ok(config)
    }

    #[must_use]
    pub fn connector(self) -> PostgresConnector {
        PostgresConnector::new(self)
    }
}

/// Fluent builder for `PostgreSQL` options.
#[derive(Debug, Clone, Default)]
pub struct PostgresOptionsBuilder {
    opts: PostgresOptions,
}

impl PostgresOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.opts.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.opts.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.port = Some(port);
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.opts.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.opts.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.opts.dbname = Some(dbname.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> PostgresOptions {
        self.opts
    }

    /// Validate the options and return a connector. Nothing connects yet.
    ///
    /// # Errors
    /// Returns `ConfigError` if the options cannot form a connection config.
    pub fn build(self) -> Result<PostgresConnector, SqlConnectorError> {
        let opts = self.finish();
        opts.to_pg_config()?;
        Ok(opts.connector())
    }
}
