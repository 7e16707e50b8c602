use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls};

use super::config::PostgresOptions;
use super::query::{execute_dml_on_client, execute_query_on_client};
use crate::connector::{Connector, LazyHandle, ensure_sql};
use crate::error::SqlConnectorError;
use crate::results::{ResultSet, RunResult, SqlResult};
use crate::statement::{Statement, StatementExecutor};
use crate::translation::{PlaceholderStyle, number_placeholders};
use crate::types::{Dialect, RowValues};

struct Shared {
    opts: PostgresOptions,
    client: LazyHandle<Client>,
}

impl Shared {
    async fn client(&self) -> Result<Arc<Client>, SqlConnectorError> {
        self.client
            .get_valid_or_try_init(|client| !client.is_closed(), || self.connect())
            .await
    }

    async fn connect(&self) -> Result<Client, SqlConnectorError> {
        let config = self.opts.to_pg_config()?;
        let (client, connection) = config.connect(NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::warn!(error = %err, "postgres connection closed with error");
            }
        });
        tracing::debug!(hosts = ?config.get_hosts(), "connected to postgres");
        Ok(client)
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
        let client = self.client().await?;
        let sql = number_placeholders(sql, PlaceholderStyle::Postgres);
        execute_query_on_client(&client, &sql, params).await
    }

    async fn run(&self, sql: &str, params: &[RowValues]) -> Result<RunResult, SqlConnectorError> {
        ensure_sql(sql)?;
        let client = self.client().await?;
        let sql = number_placeholders(sql, PlaceholderStyle::Postgres);
        execute_dml_on_client(&client, &sql, params).await
    }
}

/// Connector backed by one tokio-postgres client.
///
/// `?` placeholders are rewritten to `$1..$N` before reaching the server.
#[derive(Clone)]
pub struct PostgresConnector {
    name: &'static str,
    shared: Arc<Shared>,
}

impl PostgresConnector {
    #[must_use]
    pub fn new(opts: PostgresOptions) -> Self {
        Self::named("postgresql", opts)
    }

    /// Same binding registered under another connector name.
    #[must_use]
    pub fn named(name: &'static str, opts: PostgresOptions) -> Self {
        Self {
            name,
            shared: Arc::new(Shared {
                opts,
                client: LazyHandle::new(),
            }),
        }
    }
}

impl fmt::Debug for PostgresConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnector")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    type Instance = Arc<Client>;

    fn name(&self) -> &str {
        self.name
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgresql
    }

    async fn get_instance(&self) -> Result<Self::Instance, SqlConnectorError> {
        self.shared.client().await
    }

    async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError> {
        ensure_sql(sql)?;
        let client = self.shared.client().await?;
        client.batch_execute(sql).await?;
        Ok(RunResult::success().into())
    }

    fn prepare(&self, sql: &str) -> Statement {
        Statement::new(sql, self.shared.clone())
    }

    async fn dispose(&self) -> Result<(), SqlConnectorError> {
        // dropping the last client reference ends the spawned connection task
        if self.shared.client.take().await.is_some() {
            tracing::debug!(connector = self.name, "closed postgres client");
        }
        Ok(())
    }
}
