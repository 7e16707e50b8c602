//! Enum dispatch over every compiled-in binding.
//!
//! `Database<AnyConnector>` is what the registry and [`DatabaseConfig`](crate::DatabaseConfig)
//! hand back when the backend is only known at runtime.

use async_trait::async_trait;

use crate::connector::Connector;
use crate::error::SqlConnectorError;
use crate::results::SqlResult;
use crate::statement::Statement;
use crate::types::Dialect;

#[cfg(feature = "libsql")]
use crate::libsql::{LibsqlConnector, LibsqlHandle};
#[cfg(feature = "mssql")]
use crate::mssql::{MssqlConnector, MssqlHandle};
#[cfg(feature = "mysql")]
use crate::mysql::MysqlConnector;
#[cfg(feature = "postgres")]
use crate::postgres::PostgresConnector;
#[cfg(feature = "sqlite")]
use crate::sqlite::{SqliteConnector, SqliteHandle};

/// Any connector this build was compiled with.
#[derive(Clone, Debug)]
pub enum AnyConnector {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnector),
    #[cfg(feature = "postgres")]
    Postgres(PostgresConnector),
    #[cfg(feature = "libsql")]
    Libsql(LibsqlConnector),
    #[cfg(feature = "mysql")]
    Mysql(MysqlConnector),
    #[cfg(feature = "mssql")]
    Mssql(MssqlConnector),
}

/// Driver handle returned by [`AnyConnector::get_instance`](Connector::get_instance).
pub enum AnyInstance {
    #[cfg(feature = "sqlite")]
    Sqlite(std::sync::Arc<SqliteHandle>),
    #[cfg(feature = "postgres")]
    Postgres(std::sync::Arc<tokio_postgres::Client>),
    #[cfg(feature = "libsql")]
    Libsql(std::sync::Arc<LibsqlHandle>),
    #[cfg(feature = "mysql")]
    Mysql(std::sync::Arc<tokio::sync::Mutex<mysql_async::Conn>>),
    #[cfg(feature = "mssql")]
    Mssql(std::sync::Arc<MssqlHandle>),
}

impl std::fmt::Debug for AnyInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(handle) => f.debug_tuple("Sqlite").field(handle).finish(),
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => f.debug_tuple("Postgres").field(&"<Client>").finish(),
            #[cfg(feature = "libsql")]
            Self::Libsql(handle) => f.debug_tuple("Libsql").field(handle).finish(),
            #[cfg(feature = "mysql")]
            Self::Mysql(_) => f.debug_tuple("Mysql").field(&"<Conn>").finish(),
            #[cfg(feature = "mssql")]
            Self::Mssql(handle) => f.debug_tuple("Mssql").field(handle).finish(),
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $conn:ident => $body:expr) => {
        match $self {
            #[cfg(feature = "sqlite")]
            AnyConnector::Sqlite($conn) => $body,
            #[cfg(feature = "postgres")]
            AnyConnector::Postgres($conn) => $body,
            #[cfg(feature = "libsql")]
            AnyConnector::Libsql($conn) => $body,
            #[cfg(feature = "mysql")]
            AnyConnector::Mysql($conn) => $body,
            #[cfg(feature = "mssql")]
            AnyConnector::Mssql($conn) => $body,
        }
    };
}

#[async_trait]
impl Connector for AnyConnector {
    type Instance = AnyInstance;

    fn name(&self) -> &str {
        dispatch!(self, c => c.name())
    }

    fn dialect(&self) -> Dialect {
        dispatch!(self, c => c.dialect())
    }

    async fn get_instance(&self) -> Result<Self::Instance, SqlConnectorError> {
        match self {
            #[cfg(feature = "sqlite")]
            AnyConnector::Sqlite(c) => Ok(AnyInstance::Sqlite(c.get_instance().await?)),
            #[cfg(feature = "postgres")]
            AnyConnector::Postgres(c) => Ok(AnyInstance::Postgres(c.get_instance().await?)),
            #[cfg(feature = "libsql")]
            AnyConnector::Libsql(c) => Ok(AnyInstance::Libsql(c.get_instance().await?)),
            #[cfg(feature = "mysql")]
            AnyConnector::Mysql(c) => Ok(AnyInstance::Mysql(c.get_instance().await?)),
            #[cfg(feature = "mssql")]
            AnyConnector::Mssql(c) => Ok(AnyInstance::Mssql(c.get_instance().await?)),
        }
    }

    async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError> {
        dispatch!(self, c => c.exec(sql).await)
    }

    fn prepare(&self, sql: &str) -> Statement {
        dispatch!(self, c => c.prepare(sql))
    }

    async fn dispose(&self) -> Result<(), SqlConnectorError> {
        dispatch!(self, c => c.dispose().await)
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteConnector> for AnyConnector {
    fn from(connector: SqliteConnector) -> Self {
        AnyConnector::Sqlite(connector)
    }
}

#[cfg(feature = "postgres")]
impl From<PostgresConnector> for AnyConnector {
    fn from(connector: PostgresConnector) -> Self {
        AnyConnector::Postgres(connector)
    }
}

#[cfg(feature = "libsql")]
impl From<LibsqlConnector> for AnyConnector {
    fn from(connector: LibsqlConnector) -> Self {
        AnyConnector::Libsql(connector)
    }
}

#[cfg(feature = "mysql")]
impl From<MysqlConnector> for AnyConnector {
    fn from(connector: MysqlConnector) -> Self {
        AnyConnector::Mysql(connector)
    }
}

#[cfg(feature = "mssql")]
impl From<MssqlConnector> for AnyConnector {
    fn from(connector: MssqlConnector) -> Self {
        AnyConnector::Mssql(connector)
    }
}
