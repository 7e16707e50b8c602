use serde::Deserialize;

use super::connector::LibsqlConnector;
use crate::error::SqlConnectorError;

/// Options for a libSQL database.
///
/// `url` accepts `:memory:`, `file:<path>`, a bare path, or a remote
/// `libsql://`, `http(s)://` or `ws(s)://` URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LibsqlOptions {
    pub url: String,
    pub auth_token: Option<String>,
}

/// Where a libSQL database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibsqlTarget {
    Local(String),
    Remote { url: String, auth_token: String },
}

const REMOTE_SCHEMES: [&str; 5] = ["libsql://", "http://", "https://", "ws://", "wss://"];

impl LibsqlOptions {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
        }
    }

    #[must_use]
    pub fn memory() -> Self {
        Self::new(":memory:")
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        REMOTE_SCHEMES
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }

    /// Resolve the URL into a local path or a remote endpoint.
    ///
    /// # Errors
    /// Returns `ConfigError` when the URL is empty.
    pub fn target(&self) -> Result<LibsqlTarget, SqlConnectorError> {
        if self.url.is_empty() {
            return Err(SqlConnectorError::ConfigError(
                "libsql url is required".to_string(),
            ));
        }
        if self.is_remote() {
            return Ok(LibsqlTarget::Remote {
                url: self.url.clone(),
                auth_token: self.auth_token.clone().unwrap_or_default(),
            });
        }
        let path = self.url.strip_prefix("file:").unwrap_or(&self.url);
        Ok(LibsqlTarget::Local(path.to_string()))
    }

    #[must_use]
    pub fn connector(self) -> LibsqlConnector {
        LibsqlConnector::new(self)
    }
}

/// Fluent builder for libSQL options.
#[derive(Debug, Clone, Default)]
pub struct LibsqlOptionsBuilder {
    opts: LibsqlOptions,
}

impl LibsqlOptionsBuilder {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            opts: LibsqlOptions::new(url),
        }
    }

    #[must_use]
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.opts.auth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> LibsqlOptions {
        self.opts
    }

    /// # Errors
    /// Returns `ConfigError` when the URL is empty.
    pub fn build(self) -> Result<LibsqlConnector, SqlConnectorError> {
        let opts = self.finish();
        opts.target()?;
        Ok(opts.connector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_local_and_remote_targets() {
        assert_eq!(
            LibsqlOptions::new("file:local.db").target().unwrap(),
            LibsqlTarget::Local("local.db".into())
        );
        assert_eq!(
            LibsqlOptions::memory().target().unwrap(),
            LibsqlTarget::Local(":memory:".into())
        );
        assert_eq!(
            LibsqlOptions::new("libsql://db.example.io")
                .with_auth_token("t")
                .target()
                .unwrap(),
            LibsqlTarget::Remote {
                url: "libsql://db.example.io".into(),
                auth_token: "t".into()
            }
        );
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(matches!(
            LibsqlOptionsBuilder::new("").build(),
            Err(SqlConnectorError::ConfigError(_))
        ));
    }

    #[test]
    fn deserializes_camel_case_token() {
        let opts: LibsqlOptions =
            serde_json::from_str(r#"{"url":"https://x.turso.io","authToken":"abc"}"#).unwrap();
        assert!(opts.is_remote());
        assert_eq!(opts.auth_token.as_deref(), Some("abc"));
    }
}
