use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::connector::SqliteConnector;

/// Name that selects an in-memory database.
pub const MEMORY: &str = ":memory:";

/// Options for opening a `SQLite` database.
///
/// `name == ":memory:"` opens an in-memory database. Otherwise `path` wins;
/// without it the file lives at `<cwd>/.data/<name>.sqlite3`, with `name`
/// defaulting to `db`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqliteOptions {
    pub name: Option<String>,
    pub path: Option<String>,
    pub cwd: Option<PathBuf>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn memory() -> Self {
        Self {
            name: Some(MEMORY.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.name.as_deref() == Some(MEMORY) || self.path.as_deref() == Some(MEMORY)
    }

    /// Where the database file lives, or `:memory:`.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        if self.is_memory() {
            return PathBuf::from(MEMORY);
        }
        if let Some(path) = &self.path {
            return PathBuf::from(path);
        }
        let cwd = self.cwd.clone().unwrap_or_else(|| PathBuf::from("."));
        let name = self.name.as_deref().unwrap_or("db");
        cwd.join(".data").join(format!("{name}.sqlite3"))
    }

    /// Connector for these options. Nothing is opened until first use.
    #[must_use]
    pub fn connector(self) -> SqliteConnector {
        SqliteConnector::new(self)
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone, Default)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.opts.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.opts.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.opts.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    #[must_use]
    pub fn build(self) -> SqliteConnector {
        self.finish().connector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_name_wins_over_everything() {
        let opts = SqliteOptions::memory().with_cwd("/tmp/x");
        assert!(opts.is_memory());
        assert_eq!(opts.resolved_path(), PathBuf::from(":memory:"));
    }

    #[test]
    fn default_path_is_under_data_dir() {
        let opts = SqliteOptionsBuilder::new().cwd("/srv/app").finish();
        assert_eq!(
            opts.resolved_path(),
            PathBuf::from("/srv/app/.data/db.sqlite3")
        );
        let named = opts.with_name("users");
        assert_eq!(
            named.resolved_path(),
            PathBuf::from("/srv/app/.data/users.sqlite3")
        );
    }

    #[test]
    fn explicit_path_is_used_verbatim() {
        let opts = SqliteOptions::new().with_name("ignored").with_path("/var/db/x.db");
        assert_eq!(opts.resolved_path(), PathBuf::from("/var/db/x.db"));
    }

    #[test]
    fn deserializes_from_json() {
        let opts: SqliteOptions = serde_json::from_str(r#"{"name":":memory:"}"#).unwrap();
        assert!(opts.is_memory());
        assert!(serde_json::from_str::<SqliteOptions>(r#"{"nope":1}"#).is_err());
    }
}
