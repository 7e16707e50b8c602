use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::config::SqliteOptions;
use super::params::Params;
use super::query::{build_result_set, execute_batch, execute_dml};
use crate::connector::{Connector, LazyHandle, ensure_sql};
use crate::error::SqlConnectorError;
use crate::results::{ResultSet, RunResult, SqlResult};
use crate::statement::{Statement, StatementExecutor};
use crate::types::{Dialect, RowValues};

/// The single rusqlite connection a [`SqliteConnector`] owns.
///
/// rusqlite is blocking, so every call hops onto tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteHandle {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteHandle {
    /// Open the database described by `opts`, creating parent directories.
    ///
    /// # Errors
    /// Returns `ConnectionError` when the directory cannot be created, or the
    /// rusqlite error when opening fails.
    pub async fn open(opts: &SqliteOptions) -> Result<Self, SqlConnectorError> {
        let memory = opts.is_memory();
        let path = opts.resolved_path();
        let conn = tokio::task::spawn_blocking(move || {
            if memory {
                return Connection::open_in_memory().map_err(SqlConnectorError::from);
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SqlConnectorError::ConnectionError(format!(
                        "Failed to create SQLite directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
            let conn = Connection::open(&path)?;
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            Ok(conn)
        })
        .await??;
        tracing::debug!(path = %opts.resolved_path().display(), "opened sqlite database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    ///
    /// # Errors
    /// Whatever `f` returns, or `ExecutionError` if the blocking task panicked.
    pub async fn run_blocking<F, R>(&self, f: F) -> Result<R, SqlConnectorError>
    where
        F: FnOnce(&mut Connection) -> Result<R, SqlConnectorError> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.blocking_lock();
            f(&mut guard)
        })
        .await?
    }
}

impl fmt::Debug for SqliteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteHandle").finish_non_exhaustive()
    }
}

struct Shared {
    opts: SqliteOptions,
    handle: LazyHandle<SqliteHandle>,
}

impl Shared {
    async fn handle(&self) -> Result<Arc<SqliteHandle>, SqlConnectorError> {
        self.handle
            .get_or_try_init(|| SqliteHandle::open(&self.opts))
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
        let sql = sql.to_string();
        let params = Params::convert(params);
        handle
            .run_blocking(move |conn| build_result_set(conn, &sql, &params))
            .await
    }

    async fn run(&self, sql: &str, params: &[RowValues]) -> Result<RunResult, SqlConnectorError> {
        ensure_sql(sql)?;
        let handle = self.handle().await?;
        let sql = sql.to_string();
        let params = Params::convert(params);
        handle
            .run_blocking(move |conn| execute_dml(conn, &sql, &params))
            .await
    }
}

/// Connector backed by one rusqlite connection.
#[derive(Clone)]
pub struct SqliteConnector {
    name: &'static str,
    shared: Arc<Shared>,
}

impl SqliteConnector {
    #[must_use]
    pub fn new(opts: SqliteOptions) -> Self {
        Self::named("sqlite", opts)
    }

    /// Same binding registered under another connector name.
    #[must_use]
    pub fn named(name: &'static str, opts: SqliteOptions) -> Self {
        Self {
            name,
            shared: Arc::new(Shared {
                opts,
                handle: LazyHandle::new(),
            }),
        }
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.shared.opts
    }
}

impl fmt::Debug for SqliteConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnector")
            .field("name", &self.name)
            .field("opts", &self.shared.opts)
            .finish()
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    type Instance = Arc<SqliteHandle>;

    fn name(&self) -> &str {
        self.name
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn get_instance(&self) -> Result<Self::Instance, SqlConnectorError> {
        self.shared.handle().await
    }

    async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError> {
        ensure_sql(sql)?;
        let handle = self.shared.handle().await?;
        let sql = sql.to_string();
        let run = handle
            .run_blocking(move |conn| execute_batch(conn, &sql))
            .await?;
        Ok(run.into())
    }

    fn prepare(&self, sql: &str) -> Statement {
        Statement::new(sql, self.shared.clone())
    }

    async fn dispose(&self) -> Result<(), SqlConnectorError> {
        if let Some(handle) = self.shared.handle.take().await {
            tracing::debug!(connector = self.name, "closing sqlite database");
            drop(handle);
        }
        Ok(())
    }
}
