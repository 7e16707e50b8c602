use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Builder, Connection, Database};

use super::config::{LibsqlOptions, LibsqlTarget};
use super::params::Params;
use super::query::build_result_set;
use crate::connector::{Connector, LazyHandle, ensure_sql};
use crate::error::SqlConnectorError;
use crate::results::{ResultSet, RunResult, SqlResult};
use crate::statement::{Statement, StatementExecutor};
use crate::types::{Dialect, RowValues};

/// An opened libSQL database and the one connection used against it.
pub struct LibsqlHandle {
    database: Database,
    conn: Connection,
}

impl LibsqlHandle {
    /// # Errors
    /// Returns `ConfigError` for a bad URL, otherwise the driver error.
    pub async fn open(opts: &LibsqlOptions) -> Result<Self, SqlConnectorError> {
        let database = match opts.target()? {
            LibsqlTarget::Local(path) => Builder::new_local(path).build().await?,
            LibsqlTarget::Remote { url, auth_token } => {
                Builder::new_remote(url, auth_token).build().await?
            }
        };
        let conn = database.connect()?;
        tracing::debug!(remote = opts.is_remote(), "opened libsql database");
        Ok(Self { database, conn })
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Debug for LibsqlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibsqlHandle").finish_non_exhaustive()
    }
}

struct Shared {
    opts: LibsqlOptions,
    handle: LazyHandle<LibsqlHandle>,
}

impl Shared {
    async fn handle(&self) -> Result<Arc<LibsqlHandle>, SqlConnectorError> {
        self.handle
            .get_or_try_init(|| LibsqlHandle::open(&self.opts))
            .await
    }
}

#[async_trait]
impl StatementExecutor for Shared {
    async fn all(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlConnectorError> {
        ensure_sql(sql)?;
        let handle = self.handle().await?;
        let rows = handle
            .conn
            .query(sql, Params::convert(params).into_vec())
            .await?;
        build_result_set(rows).await
    }

    async fn run(&self, sql: &str, params: &[RowValues]) -> Result<RunResult, SqlConnectorError> {
        ensure_sql(sql)?;
        let handle = self.handle().await?;
        let changes = handle
            .conn
            .execute(sql, Params::convert(params).into_vec())
            .await?;
        Ok(RunResult::success()
            .with_changes(changes)
            .with_last_insert_rowid(handle.conn.last_insert_rowid()))
    }
}

/// Connector backed by one libSQL connection, local or remote.
#[derive(Clone)]
pub struct LibsqlConnector {
    name: &'static str,
    shared: Arc<Shared>,
}

impl LibsqlConnector {
    #[must_use]
    pub fn new(opts: LibsqlOptions) -> Self {
        Self::named("libsql-node", opts)
    }

    /// Same binding registered under another connector name.
    #[must_use]
    pub fn named(name: &'static str, opts: LibsqlOptions) -> Self {
        Self {
            name,
            shared: Arc::new(Shared {
                opts,
                handle: LazyHandle::new(),
            }),
        }
    }

    /// A connector that only talks to a remote server (`libsql-http`, `libsql-web`).
    ///
    /// # Errors
    /// Returns `ConfigError` when `opts.url` is not a remote URL.
    pub fn remote(name: &'static str, opts: LibsqlOptions) -> Result<Self, SqlConnectorError> {
        if !opts.is_remote() {
            return Err(SqlConnectorError::ConfigError(format!(
                "{name} requires a remote url, got {:?}",
                opts.url
            )));
        }
        Ok(Self::named(name, opts))
    }
}

impl fmt::Debug for LibsqlConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibsqlConnector")
            .field("name", &self.name)
            .field("url", &self.shared.opts.url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for LibsqlConnector {
    type Instance = Arc<LibsqlHandle>;

    fn name(&self) -> &str {
        self.name
    }

    fn dialect(&self) -> Dialect {
        Dialect::Libsql
    }

    async fn get_instance(&self) -> Result<Self::Instance, SqlConnectorError> {
        self.shared.handle().await
    }

    async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError> {
        ensure_sql(sql)?;
        let handle = self.shared.handle().await?;
        handle.conn.execute_batch(sql).await?;
        Ok(RunResult::success().into())
    }

    fn prepare(&self, sql: &str) -> Statement {
        Statement::new(sql, self.shared.clone())
    }

    async fn dispose(&self) -> Result<(), SqlConnectorError> {
        if self.shared.handle.take().await.is_some() {
            tracing::debug!(connector = self.name, "closed libsql database");
        }
        Ok(())
    }
}
