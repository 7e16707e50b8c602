mod common;

use std::sync::Arc;
use std::time::Duration;

use common::RecordingConnector;
use sql_connector::DISPOSED_MESSAGE;
use sql_connector::prelude::*;

#[tokio::test]
async fn test03_dispose_is_idempotent() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    let db = create_database(connector.clone());

    db.dispose().await.unwrap();
    db.dispose().await.unwrap();
    assert!(db.disposed());
    assert_eq!(connector.log.disposals(), 1);
}

#[tokio::test]
async fn test03_concurrent_dispose_runs_hook_once() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    let db = Arc::new(create_database(connector.clone()));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let db = Arc::clone(&db);
        tasks.push(tokio::spawn(async move { db.dispose().await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert_eq!(connector.log.disposals(), 1);
}

#[tokio::test]
async fn test03_operations_fail_after_dispose() {
    let connector = RecordingConnector::new(Dialect::Postgresql);
    let db = create_database(connector.clone());
    db.dispose().await.unwrap();

    let err = db.exec("SELECT 1").await.unwrap_err();
    assert!(err.is_disposed());
    assert_eq!(err.to_string(), DISPOSED_MESSAGE);
    assert!(db.prepare("SELECT 1").unwrap_err().is_disposed());
    assert!(db.sql("SELECT 1").await.unwrap_err().is_disposed());
    assert!(db.get_instance().await.unwrap_err().is_disposed());
    assert!(connector.log.calls().is_empty());
}

#[tokio::test]
async fn test03_disposed_check_precedes_template_validation() {
    let db = create_database(RecordingConnector::new(Dialect::Sqlite));
    db.dispose().await.unwrap();
    let err = db.sql(SqlTemplate::new(["a", "b"], Vec::<RowValues>::new())).await;
    assert!(err.unwrap_err().is_disposed());
}

#[tokio::test]
async fn test03_statement_outlives_disposal_check() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    let db = create_database(connector.clone());
    let stmt = db.prepare("SELECT 1").unwrap();
    db.dispose().await.unwrap();
    // prepared statements talk to the connector directly
    stmt.all(&[]).await.unwrap();
    assert_eq!(connector.log.calls().len(), 1);
}

#[tokio::test]
async fn test03_guard_disposes_on_drop() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    {
        let guard = create_database(connector.clone()).scoped();
        guard.exec("SELECT 1").await.unwrap();
    }
    for _ in 0..50 {
        if connector.log.disposals() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(connector.log.disposals(), 1);
}

#[tokio::test]
async fn test03_guard_explicit_dispose_and_into_inner() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    create_database(connector.clone())
        .scoped()
        .dispose()
        .await
        .unwrap();
    assert_eq!(connector.log.disposals(), 1);

    let other = RecordingConnector::new(Dialect::Sqlite);
    let db = create_database(other.clone()).scoped().into_inner();
    assert!(!db.disposed());
    tokio::task::yield_now().await;
    assert_eq!(other.log.disposals(), 0);
}

#[tokio::test]
async fn test03_guard_dropped_after_dispose_skips_second_hook() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    let guard = create_database(connector.clone()).scoped();
    Database::dispose(&guard).await.unwrap();
    assert!(guard.disposed());
    drop(guard);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(connector.log.disposals(), 1);
}

#[tokio::test]
async fn test03_released_guard_keeps_database_usable() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    let guard = create_database(connector.clone()).scoped();
    let db = guard.into_inner();
    tokio::time::sleep(Duration::from_millis(10)).await;
    db.exec("SELECT 1").await.unwrap();
    assert_eq!(connector.log.disposals(), 0);
}

#[tokio::test]
async fn test03_using_disposes_after_error() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    let db = create_database(connector.clone());

    let outcome: Result<(), _> = db
        .using(|db| async move {
            db.exec("SELECT 1").await?;
            Err(SqlConnectorError::Other("stop".into()))
        })
        .await;
    assert!(matches!(outcome, Err(SqlConnectorError::Other(_))));
    assert!(db.disposed());
    assert_eq!(connector.log.disposals(), 1);
}

#[test]
fn test03_guard_without_runtime_skips_hook() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    drop(create_database(connector.clone()).scoped());
    assert_eq!(connector.log.disposals(), 0);
}
