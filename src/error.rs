use thiserror::Error;

use crate::types::RowValues;

/// Message carried by [`SqlConnectorError::Disposed`].
pub const DISPOSED_MESSAGE: &str = "This database instance has been disposed and cannot be used.";

#[derive(Debug, Error)]
pub enum SqlConnectorError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    #[cfg(feature = "libsql")]
    #[error(transparent)]
    LibsqlError(#[from] libsql::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MysqlError(#[from] mysql_async::Error),

    /// The fragment/value pair handed to the template compiler is malformed.
    #[error("[sql-connector] invalid template invocation: {0}")]
    InvalidInvocation(String),

    #[error("{}", DISPOSED_MESSAGE)]
    Disposed,

    #[error("SQL query must be provided")]
    EmptyQuery,

    #[error("Unknown connector: {0}")]
    UnknownConnector(String),

    /// A driver failure annotated with the statement that produced it.
    #[error("{source}")]
    Statement {
        sql: String,
        parameters: Vec<RowValues>,
        #[source]
        source: Box<SqlConnectorError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl SqlConnectorError {
    /// Wrap `self` with the SQL text and parameters that were being executed.
    #[must_use]
    pub fn with_statement(self, sql: impl Into<String>, parameters: &[RowValues]) -> Self {
        SqlConnectorError::Statement {
            sql: sql.into(),
            parameters: parameters.to_vec(),
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        matches!(self, SqlConnectorError::Disposed)
    }

    /// SQL text attached by [`SqlConnectorError::with_statement`], if any.
    #[must_use]
    pub fn sql(&self) -> Option<&str> {
        match self {
            SqlConnectorError::Statement { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// Parameters attached by [`SqlConnectorError::with_statement`], if any.
    #[must_use]
    pub fn parameters(&self) -> Option<&[RowValues]> {
        match self {
            SqlConnectorError::Statement { parameters, .. } => Some(parameters),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for SqlConnectorError {
    fn from(err: tokio::task::JoinError) -> Self {
        SqlConnectorError::ExecutionError(format!("blocking task join error: {err}"))
    }
}

impl From<serde_json::Error> for SqlConnectorError {
    fn from(err: serde_json::Error) -> Self {
        SqlConnectorError::ConfigError(format!("invalid connector options: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposed_message_is_fixed() {
        assert_eq!(
            SqlConnectorError::Disposed.to_string(),
            "This database instance has been disposed and cannot be used."
        );
    }

    #[test]
    fn statement_annotation_keeps_source() {
        let err = SqlConnectorError::ExecutionError("boom".into())
            .with_statement("SELECT @1", &[RowValues::Int(1)]);
        assert_eq!(err.sql(), Some("SELECT @1"));
        assert_eq!(err.parameters(), Some(&[RowValues::Int(1)][..]));
        assert_eq!(err.to_string(), "SQL execution error: boom");
        assert!(std::error::Error::source(&err).is_some());
    }
}
