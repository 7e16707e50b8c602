use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SqlConnectorError;
use crate::results::{CustomDbRow, ResultSet, RunResult};
use crate::types::RowValues;

/// Backend half of a [`Statement`]: runs SQL text with concrete parameters.
///
/// Connectors implement this once and hand out `Statement`s that share it.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Execute and collect every returned row.
    async fn all(&self, sql: &str, params: &[RowValues])
    -> Result<ResultSet, SqlConnectorError>;

    /// Execute for side effects.
    async fn run(&self, sql: &str, params: &[RowValues])
    -> Result<RunResult, SqlConnectorError>;

    /// Execute and return the first row, if any.
    async fn get(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, SqlConnectorError> {
        Ok(self.all(sql, params).await?.into_first())
    }
}

/// A prepared SQL unit that can be bound and executed repeatedly.
///
/// Parameters passed to `all`/`run`/`get` take precedence over the ones
/// stored with [`Statement::bind`], for that call only:
///
/// ```rust,no_run
/// use sql_connector::prelude::*;
///
/// # async fn demo(db: &Database) -> Result<(), SqlConnectorError> {
/// let stmt = db
///     .prepare("SELECT * FROM users WHERE id = ?")?
///     .bind(vec![RowValues::Int(1)]);
/// let first = stmt.all(&[]).await?; // id = 1
/// let other = stmt.all(&[RowValues::Int(2)]).await?; // id = 2
/// # let _ = (first, other);
/// # Ok(()) }
/// ```
#[derive(Clone)]
pub struct Statement {
    sql: Arc<str>,
    params: Vec<RowValues>,
    executor: Arc<dyn StatementExecutor>,
}

impl Statement {
    pub fn new(sql: &str, executor: Arc<dyn StatementExecutor>) -> Self {
        Self {
            sql: Arc::from(sql),
            params: Vec::new(),
            executor,
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn bound_params(&self) -> &[RowValues] {
        &self.params
    }

    /// Store parameters for later calls. An empty list keeps the previous binding.
    #[must_use]
    pub fn bind<I>(mut self, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RowValues>,
    {
        let params: Vec<RowValues> = params.into_iter().map(Into::into).collect();
        if !params.is_empty() {
            self.params = params;
        }
        self
    }

    fn effective<'a>(&'a self, params: &'a [RowValues]) -> &'a [RowValues] {
        if params.is_empty() {
            &self.params
        } else {
            params
        }
    }

    /// # Errors
    /// Propagates the connector's failure unchanged.
    pub async fn all(&self, params: &[RowValues]) -> Result<ResultSet, SqlConnectorError> {
        self.executor.all(&self.sql, self.effective(params)).await
    }

    /// # Errors
    /// Propagates the connector's failure unchanged.
    pub async fn run(&self, params: &[RowValues]) -> Result<RunResult, SqlConnectorError> {
        self.executor.run(&self.sql, self.effective(params)).await
    }

    /// # Errors
    /// Propagates the connector's failure unchanged.
    pub async fn get(
        &self,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, SqlConnectorError> {
        self.executor.get(&self.sql, self.effective(params)).await
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
