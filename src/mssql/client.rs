use tiberius::{Client, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use super::config::MssqlOptions;
use crate::error::SqlConnectorError;

/// Type alias for SQL Server client
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Open and log in a new SQL Server connection.
///
/// Named instances are resolved through the SQL Browser service.
///
/// # Errors
/// Returns `ConnectionError` if the TCP connection or login fails.
pub async fn create_mssql_client(opts: &MssqlOptions) -> Result<MssqlClient, SqlConnectorError> {
    let config = opts.to_tiberius_config();

    let tcp = if opts.instance_name.is_some() {
        TcpStream::connect_named(&config).await.map_err(|e| {
            SqlConnectorError::ConnectionError(format!("SQL Browser lookup error: {e}"))
        })?
    } else {
        TcpStream::connect(config.get_addr()).await.map_err(|e| {
            SqlConnectorError::ConnectionError(format!("TCP connection error: {e}"))
        })?
    };
    tcp.set_nodelay(true)
        .map_err(|e| SqlConnectorError::ConnectionError(format!("TCP option error: {e}")))?;

    let client = Client::connect(config, tcp.compat_write())
        .await
        .map_err(|e| {
            SqlConnectorError::ConnectionError(format!("SQL Server connection error: {e}"))
        })?;
    tracing::debug!(server = %opts.server, "logged in to sql server");
    Ok(client)
}
