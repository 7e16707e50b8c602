use std::future::Future;
use std::ops::Deref;
use std::sync::{Arc, LazyLock};
use std::sync::atomic::{AtomicBool, Ordering};

use regex::Regex;

use crate::any::AnyConnector;
use crate::connector::Connector;
use crate::error::SqlConnectorError;
use crate::results::SqlResult;
use crate::statement::Statement;
use crate::template::SqlTemplate;
use crate::types::Dialect;

static SQL_SELECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^select").expect("select pattern compiles")
});
static SQL_RETURNING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\sreturning\s").expect("returning pattern compiles")
});

/// How `Database::sql` routes a compiled statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Fetch rows through `Statement::all`.
    ReadReturning,
    /// Execute through `Statement::run`.
    Mutation,
}

/// Classify compiled SQL by text heuristics.
///
/// A statement is read-returning when it starts with `select`, or when the
/// dialect supports `RETURNING` and the keyword appears surrounded by
/// whitespace. Keywords inside string literals or comments still count.
#[must_use]
pub fn classify(sql: &str, dialect: Dialect) -> StatementKind {
    if SQL_SELECT_RE.is_match(sql)
        || (dialect.supports_returning() && SQL_RETURNING_RE.is_match(sql))
    {
        StatementKind::ReadReturning
    } else {
        StatementKind::Mutation
    }
}

/// Disposal-aware facade over exactly one [`Connector`].
///
/// ```rust,no_run
/// use sql_connector::prelude::*;
/// use sql_connector::sqlite::SqliteOptions;
///
/// # async fn demo() -> Result<(), SqlConnectorError> {
/// let db = create_database(SqliteOptions::memory().connector());
/// db.exec("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").await?;
/// db.sql(sql_template!("INSERT INTO users (name) VALUES (", "alice", ")")).await?;
/// let res = db.sql(sql_template!("SELECT * FROM users WHERE name = ", "alice", "")).await?;
/// assert_eq!(res.rows().len(), 1);
/// db.dispose().await?;
/// # Ok(()) }
/// ```
pub struct Database<C: Connector = AnyConnector> {
    connector: C,
    disposed: AtomicBool,
}

/// Wrap a connector in a [`Database`].
pub fn create_database<C: Connector>(connector: C) -> Database<C> {
    Database::new(connector)
}

impl<C: Connector> Database<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            disposed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.connector.dialect()
    }

    #[must_use]
    pub fn disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn check_disposed(&self) -> Result<(), SqlConnectorError> {
        if self.disposed() {
            Err(SqlConnectorError::Disposed)
        } else {
            Ok(())
        }
    }

    /// Underlying driver handle.
    ///
    /// # Errors
    /// [`SqlConnectorError::Disposed`] after disposal, otherwise the connector's error.
    pub async fn get_instance(&self) -> Result<C::Instance, SqlConnectorError> {
        self.check_disposed()?;
        self.connector.get_instance().await
    }

    /// Run SQL text with no parameters.
    ///
    /// # Errors
    /// [`SqlConnectorError::Disposed`] after disposal, otherwise the connector's error.
    pub async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError> {
        self.check_disposed()?;
        self.connector.exec(sql).await
    }

    /// # Errors
    /// [`SqlConnectorError::Disposed`] after disposal.
    pub fn prepare(&self, sql: &str) -> Result<Statement, SqlConnectorError> {
        self.check_disposed()?;
        Ok(self.connector.prepare(sql))
    }

    /// Compile a template and route it by [`classify`].
    ///
    /// Read-returning statements come back as `{ rows, success: true }`;
    /// mutations return the driver's run envelope.
    ///
    /// # Errors
    /// [`SqlConnectorError::Disposed`] after disposal,
    /// [`SqlConnectorError::InvalidInvocation`] for a malformed template, otherwise
    /// the connector's error.
    pub async fn sql(
        &self,
        template: impl Into<SqlTemplate>,
    ) -> Result<SqlResult, SqlConnectorError> {
        self.check_disposed()?;
        let compiled = template.into().compile()?;
        let kind = classify(&compiled.sql, self.connector.dialect());
        tracing::trace!(sql = %compiled.sql, params = compiled.params.len(), "compiled template");
        tracing::debug!(connector = self.connector.name(), ?kind, "dispatching statement");

        let stmt = self.connector.prepare(&compiled.sql);
        match kind {
            StatementKind::ReadReturning => {
                let rows = stmt.all(&compiled.params).await?;
                Ok(SqlResult::from_rows(rows))
            }
            StatementKind::Mutation => Ok(stmt.run(&compiled.params).await?.into()),
        }
    }

    /// Dispose the connector. Only the first call reaches the connector hook.
    ///
    /// # Errors
    /// Whatever the connector's dispose hook fails with.
    pub async fn dispose(&self) -> Result<(), SqlConnectorError> {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::debug!(connector = self.connector.name(), "disposing database");
        self.connector.dispose().await
    }

    /// Move the database into a guard that disposes it when dropped.
    #[must_use]
    pub fn scoped(self) -> DatabaseGuard<C>
    where
        C: 'static,
    {
        DatabaseGuard {
            db: Arc::new(self),
            released: false,
        }
    }

    /// Run `f` with the database, then dispose it whatever `f` returned.
    ///
    /// # Errors
    /// The error from `f`, or from disposal when `f` succeeded.
    pub async fn using<'a, F, Fut, T>(&'a self, f: F) -> Result<T, SqlConnectorError>
    where
        F: FnOnce(&'a Self) -> Fut,
        Fut: Future<Output = Result<T, SqlConnectorError>>,
    {
        let outcome = f(self).await;
        let disposed = self.dispose().await;
        let value = outcome?;
        disposed?;
        Ok(value)
    }
}

impl<C: Connector> std::fmt::Debug for Database<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connector", &self.connector.name())
            .field("dialect", &self.connector.dialect())
            .field("disposed", &self.disposed())
            .finish()
    }
}

/// Scoped owner of a [`Database`]; disposes it on drop.
///
/// Dropping schedules the connector hook on the current tokio runtime. Call
/// [`DatabaseGuard::dispose`] to await disposal and observe its result.
pub struct DatabaseGuard<C: Connector + 'static = AnyConnector> {
    db: Arc<Database<C>>,
    released: bool,
}

impl<C: Connector + 'static> DatabaseGuard<C> {
    /// Dispose now and wait for the connector hook.
    ///
    /// # Errors
    /// Whatever the connector's dispose hook fails with.
    pub async fn dispose(self) -> Result<(), SqlConnectorError> {
        self.db.dispose().await
    }

    /// Give the database back without disposing it.
    #[must_use]
    pub fn into_inner(mut self) -> Arc<Database<C>> {
        self.released = true;
        Arc::clone(&self.db)
    }
}

impl<C: Connector + 'static> Deref for DatabaseGuard<C> {
    type Target = Database<C>;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

impl<C: Connector + 'static> Drop for DatabaseGuard<C> {
    fn drop(&mut self) {
        if self.released || self.db.disposed() {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let db = Arc::clone(&self.db);
                handle.spawn(async move {
                    if let Err(err) = db.dispose().await {
                        tracing::warn!(error = %err, "scoped database dispose failed");
                    }
                });
            }
            Err(_) => {
                self.db.disposed.store(true, Ordering::SeqCst);
                tracing::warn!(
                    connector = self.db.connector.name(),
                    "no tokio runtime on drop; connector dispose hook skipped"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_is_read_returning_everywhere() {
        for dialect in [
            Dialect::Mysql,
            Dialect::Postgresql,
            Dialect::Sqlite,
            Dialect::Libsql,
            Dialect::Mssql,
        ] {
            assert_eq!(
                classify("SELECT * FROM t", dialect),
                StatementKind::ReadReturning
            );
            assert_eq!(classify("select 1", dialect), StatementKind::ReadReturning);
        }
    }

    #[test]
    fn returning_depends_on_dialect() {
        let sql = "INSERT INTO t (a) VALUES (?) RETURNING id";
        assert_eq!(
            classify(sql, Dialect::Postgresql),
            StatementKind::ReadReturning
        );
        assert_eq!(classify(sql, Dialect::Sqlite), StatementKind::ReadReturning);
        assert_eq!(classify(sql, Dialect::Mysql), StatementKind::Mutation);
        assert_eq!(classify(sql, Dialect::Mssql), StatementKind::Mutation);
        assert_eq!(classify(sql, Dialect::Libsql), StatementKind::Mutation);
    }

    #[test]
    fn returning_must_be_whitespace_delimited() {
        assert_eq!(
            classify("UPDATE t SET returning_count = 1", Dialect::Postgresql),
            StatementKind::Mutation
        );
        assert_eq!(
            classify("DELETE FROM t\nRETURNING\n*", Dialect::Sqlite),
            StatementKind::ReadReturning
        );
    }

    #[test]
    fn leading_text_is_not_trimmed_here() {
        // the template compiler trims; classify sees text as given
        assert_eq!(
            classify("  SELECT 1", Dialect::Sqlite),
            StatementKind::Mutation
        );
        assert_eq!(
            classify("WITH x AS (SELECT 1) SELECT * FROM x", Dialect::Mysql),
            StatementKind::Mutation
        );
    }
}
