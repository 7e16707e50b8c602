use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};

use super::client::{MssqlClient, create_mssql_client};
use super::config::MssqlOptions;
use super::params::prepare_sql_parameters;
use super::query::build_result_set;
use crate::connector::{Connector, LazyHandle, ensure_sql};
use crate::error::SqlConnectorError;
use crate::results::{ResultSet, RunResult, SqlResult};
use crate::statement::{Statement, StatementExecutor};
use crate::types::{Dialect, RowValues};

/// Slot for the SQL Server client. Empty once the connection was closed.
///
/// Every statement run through the connector closes the connection when it
/// finishes, so a handle obtained from `get_instance` is only logged in until
/// the next statement.
pub struct MssqlHandle {
    client: Mutex<Option<MssqlClient>>,
}

impl MssqlHandle {
    fn new(client: MssqlClient) -> Self {
        Self {
            client: Mutex::new(Some(client)),
        }
    }

    /// Lock the slot and return the raw tiberius client, if still connected.
    ///
    /// Statements on the owning connector wait while the guard is held.
    pub async fn client(&self) -> MutexGuard<'_, Option<MssqlClient>> {
        self.client.lock().await
    }

    /// Whether the slot still holds a logged-in client.
    ///
    /// A slot that is busy counts as logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.client.try_lock().map_or(true, |client| client.is_some())
    }
}

impl fmt::Debug for MssqlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MssqlHandle")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

struct Shared {
    opts: MssqlOptions,
    handle: LazyHandle<MssqlHandle>,
}

impl Shared {
    async fn handle(&self) -> Result<Arc<MssqlHandle>, SqlConnectorError> {
        self.handle
            .get_valid_or_try_init(MssqlHandle::is_logged_in, || async {
                Ok::<_, SqlConnectorError>(MssqlHandle::new(
                    create_mssql_client(&self.opts).await?,
                ))
            })
            .await
    }

    /// Connect if needed, run one request, then close the connection
    /// whatever the outcome.
    async fn run_request(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlConnectorError> {
        ensure_sql(sql)?;
        let handle = self.handle().await?;
        let prepared = prepare_sql_parameters(sql, params);

        let mut slot = handle.client.lock().await;
        if slot.is_none() {
            *slot = Some(create_mssql_client(&self.opts).await?);
        }
        let outcome = match slot.as_mut() {
            Some(client) => build_result_set(client, &prepared).await,
            None => Err(SqlConnectorError::ConnectionError(
                "SQL Server client unavailable".to_string(),
            )),
        };
        if let Some(client) = slot.take() {
            if let Err(err) = client.close().await {
                tracing::debug!(error = %err, "closing sql server connection failed");
            }
        }
        drop(slot);

        outcome.map_err(|err| err.with_statement(prepared.sql, params))
    }
}

#[async_trait]
impl StatementExecutor for Shared {
    async fn all(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlConnectorError> {
        self.run_request(sql, params).await
    }

    async fn run(&self, sql: &str, params: &[RowValues]) -> Result<RunResult, SqlConnectorError> {
        self.run_request(sql, params).await?;
        Ok(RunResult::success())
    }
}

/// Connector for SQL Server.
///
/// Each request connects if needed, runs, and closes the connection again,
/// so calls on one connector are serialized.
#[derive(Clone)]
pub struct MssqlConnector {
    shared: Arc<Shared>,
}

impl MssqlConnector {
    #[must_use]
    pub fn new(opts: MssqlOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                opts,
                handle: LazyHandle::new(),
            }),
        }
    }
}

impl fmt::Debug for MssqlConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MssqlConnector")
            .field("server", &self.shared.opts.server)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for MssqlConnector {
    type Instance = Arc<MssqlHandle>;

    fn name(&self) -> &str {
        "mssql"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Mssql
    }

    async fn get_instance(&self) -> Result<Self::Instance, SqlConnectorError> {
        self.shared.handle().await
    }

    async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError> {
        let rows = self.shared.run_request(sql, &[]).await?;
        Ok(SqlResult::from_rows(rows))
    }

    fn prepare(&self, sql: &str) -> Statement {
        Statement::new(sql, self.shared.clone())
    }

    async fn dispose(&self) -> Result<(), SqlConnectorError> {
        if let Some(handle) = self.shared.handle.take().await {
            if let Some(client) = handle.client.lock().await.take() {
                client.close().await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_handle() -> MssqlHandle {
        MssqlHandle {
            client: Mutex::new(None),
        }
    }

    #[tokio::test]
    async fn client_accessor_exposes_the_slot() {
        let handle = closed_handle();
        assert!(!handle.is_logged_in());

        let guard = handle.client().await;
        assert!(guard.is_none());
        // a held slot is treated as busy, not logged out
        assert!(handle.is_logged_in());
        drop(guard);
        assert!(!handle.is_logged_in());
    }
}
