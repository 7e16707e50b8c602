#![cfg(feature = "mssql")]

use sql_connector::mssql::{MssqlConnector, MssqlOptions};
use sql_connector::prelude::*;

fn unreachable_connector() -> MssqlConnector {
    MssqlOptions::new("127.0.0.1".into(), "sa".into(), "secret".into())
        .with_port(Some(1))
        .connector()
}

#[tokio::test]
async fn test07_empty_exec_fails_before_connecting() {
    let connector = unreachable_connector();
    let err = connector.exec("").await.unwrap_err();
    assert!(matches!(err, SqlConnectorError::EmptyQuery));
    assert_eq!(err.to_string(), "SQL query must be provided");
}

#[tokio::test]
async fn test07_empty_statement_fails_before_connecting() {
    let db = create_database(unreachable_connector());
    let err = db.prepare("").unwrap().all(&[]).await.unwrap_err();
    assert_eq!(err.to_string(), "SQL query must be provided");
    let err = db.exec("").await.unwrap_err();
    assert!(matches!(err, SqlConnectorError::EmptyQuery));
    assert_eq!(db.connector().name(), "mssql");
    assert_eq!(db.dialect(), Dialect::Mssql);
}
