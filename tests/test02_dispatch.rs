mod common;

use common::{RecordingConnector, Route};
use sql_connector::prelude::*;

#[tokio::test]
async fn test02_select_routes_to_all() {
    let connector = RecordingConnector::new(Dialect::Mysql);
    let db = create_database(connector.clone());

    let res = db
        .sql(sql_template!("select * from t where id = ", 7, ""))
        .await
        .unwrap();
    assert!(res.success);
    assert_eq!(res.rows().len(), 1);
    assert_eq!(
        res.rows()[0].get("sql"),
        Some(&RowValues::Text("select * from t where id = ?".into()))
    );

    let calls = connector.log.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].route, Route::All);
    assert_eq!(calls[0].params, vec![RowValues::Int(7)]);
}

#[tokio::test]
async fn test02_returning_depends_on_dialect() {
    let sql = "INSERT INTO t (a) VALUES (1) RETURNING id";
    for (dialect, route) in [
        (Dialect::Postgresql, Route::All),
        (Dialect::Sqlite, Route::All),
        (Dialect::Libsql, Route::Run),
        (Dialect::Mysql, Route::Run),
        (Dialect::Mssql, Route::Run),
    ] {
        let connector = RecordingConnector::new(dialect);
        let db = create_database(connector.clone());
        db.sql(sql).await.unwrap();
        assert_eq!(connector.log.calls()[0].route, route, "{dialect}");
    }
}

#[tokio::test]
async fn test02_mutation_returns_run_envelope() {
    let connector = RecordingConnector::new(Dialect::Postgresql);
    let db = create_database(connector.clone());

    let res = db
        .sql(sql_template!("  UPDATE {", "t", "} SET a = ", "b", "  "))
        .await
        .unwrap();
    assert!(res.success);
    assert!(res.rows.is_none());
    assert_eq!(res.changes, Some(1));

    let call = &connector.log.calls()[0];
    assert_eq!(call.route, Route::Run);
    assert_eq!(call.sql, "UPDATE t SET a = ?");
    assert_eq!(call.params, vec![RowValues::Text("b".into())]);
}

#[tokio::test]
async fn test02_exec_and_prepare_pass_through() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    let db = create_database(connector.clone());

    db.exec("CREATE TABLE t (a INT)").await.unwrap();
    let stmt = db.prepare("SELECT a FROM t WHERE a = ?").unwrap().bind([3]);
    stmt.get(&[]).await.unwrap();
    stmt.run(&[RowValues::Int(4)]).await.unwrap();

    let calls = connector.log.calls();
    assert_eq!(calls[0].route, Route::Exec);
    assert_eq!(calls[1].route, Route::All);
    assert_eq!(calls[1].params, vec![RowValues::Int(3)]);
    assert_eq!(calls[2].route, Route::Run);
    assert_eq!(calls[2].params, vec![RowValues::Int(4)]);
    assert_eq!(db.get_instance().await.unwrap(), 0);
    assert_eq!(db.dialect(), Dialect::Sqlite);
}

#[tokio::test]
async fn test02_results_serialize_as_objects() {
    let db = create_database(RecordingConnector::new(Dialect::Sqlite));
    let res = db.sql("SELECT 1").await.unwrap();
    let json = serde_json::to_value(&res).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["rows"][0]["sql"], "SELECT 1");
}

#[tokio::test]
async fn test02_invalid_template_never_reaches_connector() {
    let connector = RecordingConnector::new(Dialect::Sqlite);
    let db = create_database(connector.clone());
    let err = db
        .sql(SqlTemplate::new(["SELECT "], [1]))
        .await
        .unwrap_err();
    assert!(matches!(err, SqlConnectorError::InvalidInvocation(_)));
    assert!(connector.log.calls().is_empty());
}
