use serde::Deserialize;
use tiberius::{AuthMethod, Config as TiberiusConfig};

use super::connector::MssqlConnector;

fn default_trust_cert() -> bool {
    true
}

/// Options for connecting to SQL Server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MssqlOptions {
    pub server: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub instance_name: Option<String>,
    #[serde(default = "default_trust_cert")]
    pub trust_cert: bool,
}

impl MssqlOptions {
    #[must_use]
    pub fn new(server: String, user: String, password: String) -> Self {
        Self {
            server,
            database: None,
            user,
            password,
            port: None,
            instance_name: None,
            trust_cert: true,
        }
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_instance_name(mut self, instance_name: Option<String>) -> Self {
        self.instance_name = instance_name;
        self
    }

    /// Translate into a tiberius config.
    #[must_use]
    pub fn to_tiberius_config(&self) -> TiberiusConfig {
        let mut config = TiberiusConfig::new();
        config.host(&self.server);
        if let Some(database) = &self.database {
            config.database(database);
        }
        config.port(self.port.unwrap_or(1433));
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        if let Some(instance) = &self.instance_name {
            config.instance_name(instance);
        }
        if self.trust_cert {
            config.trust_cert();
        }
        config
    }

    #[must_use]
    pub fn connector(self) -> MssqlConnector {
        MssqlConnector::new(self)
    }
}

/// Fluent builder for SQL Server options.
#[derive(Debug, Clone)]
pub struct MssqlOptionsBuilder {
    opts: MssqlOptions,
}

impl MssqlOptionsBuilder {
    #[must_use]
    pub fn new(server: String, user: String, password: String) -> Self {
        Self {
            opts: MssqlOptions::new(server, user, password),
        }
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.opts.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn instance_name(mut self, instance_name: Option<String>) -> Self {
        self.opts.instance_name = instance_name;
        self
    }

    #[must_use]
    pub fn trust_cert(mut self, trust_cert: bool) -> Self {
        self.opts.trust_cert = trust_cert;
        self
    }

    #[must_use]
    pub fn finish(self) -> MssqlOptions {
        self.opts
    }

    #[must_use]
    pub fn build(self) -> MssqlConnector {
        self.finish().connector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_options_default_to_trusting_the_cert() {
        let opts: MssqlOptions = serde_json::from_str(
            r#"{"server":"localhost","user":"sa","password":"pw","database":"test"}"#,
        )
        .unwrap();
        assert!(opts.trust_cert);
        assert_eq!(opts.database.as_deref(), Some("test"));
        assert_eq!(opts.to_tiberius_config().get_addr(), "localhost:1433");
    }

    #[test]
    fn builder_sets_port() {
        let opts = MssqlOptionsBuilder::new("db".into(), "sa".into(), "pw".into())
            .port(Some(14330))
            .finish();
        assert_eq!(opts.to_tiberius_config().get_addr(), "db:14330");
    }
}
