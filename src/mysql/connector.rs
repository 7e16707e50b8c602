use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mysql_async::Conn;
use tokio::sync::Mutex;

use super::config::MysqlOptions;
use super::params::convert;
use super::query::{execute_batch, execute_dml, execute_select};
use crate::connector::{Connector, LazyHandle, ensure_sql};
use crate::error::SqlConnectorError;
use crate::results::{ResultSet, RunResult, SqlResult};
use crate::statement::{Statement, StatementExecutor};
use crate::types::{Dialect, RowValues};

struct Shared {
    opts: MysqlOptions,
    conn: LazyHandle<Mutex<Conn>>,
}

impl Shared {
    async fn conn(&self) -> Result<Arc<Mutex<Conn>>, SqlConnectorError> {
        self.conn
            .get_or_try_init(|| async {
                let conn = Conn::new(self.opts.to_opts()?).await?;
                tracing::debug!("connected to mysql");
                Ok::<_, SqlConnectorError>(Mutex::new(conn))
            })
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
        let params = convert(params)?;
        let conn = self.conn().await?;
        let mut conn = conn.lock().await;
        execute_select(&mut conn, sql, params).await
    }

    async fn run(&self, sql: &str, params: &[RowValues]) -> Result<RunResult, SqlConnectorError> {
        ensure_sql(sql)?;
        let params = convert(params)?;
        let conn = self.conn().await?;
        let mut conn = conn.lock().await;
        execute_dml(&mut conn, sql, params).await
    }
}

/// Connector backed by one mysql_async connection.
///
/// Statements on one connector share the connection and run one at a time.
#[derive(Clone)]
pub struct MysqlConnector {
    name: &'static str,
    shared: Arc<Shared>,
}

impl MysqlConnector {
    #[must_use]
    pub fn new(opts: MysqlOptions) -> Self {
        Self::named("mysql2", opts)
    }

    /// Same binding registered under another connector name.
    #[must_use]
    pub fn named(name: &'static str, opts: MysqlOptions) -> Self {
        Self {
            name,
            shared: Arc::new(Shared {
                opts,
                conn: LazyHandle::new(),
            }),
        }
    }
}

impl fmt::Debug for MysqlConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysqlConnector")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for MysqlConnector {
    type Instance = Arc<Mutex<Conn>>;

    fn name(&self) -> &str {
        self.name
    }

    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    async fn get_instance(&self) -> Result<Self::Instance, SqlConnectorError> {
        self.shared.conn().await
    }

    async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError> {
        ensure_sql(sql)?;
        let conn = self.shared.conn().await?;
        let mut conn = conn.lock().await;
        Ok(execute_batch(&mut conn, sql).await?.into())
    }

    fn prepare(&self, sql: &str) -> Statement {
        Statement::new(sql, self.shared.clone())
    }

    async fn dispose(&self) -> Result<(), SqlConnectorError> {
        let Some(conn) = self.shared.conn.take().await else {
            return Ok(());
        };
        match Arc::try_unwrap(conn) {
            Ok(conn) => conn.into_inner().disconnect().await?,
            Err(_) => tracing::debug!(
                connector = self.name,
                "mysql connection still borrowed; dropping instead of disconnecting"
            ),
        }
        Ok(())
    }
}
