use sql_connector::prelude::*;
use sql_connector::{Backend, CONNECTORS, create_connector_by_name, resolve_binding};

#[test]
fn test05_every_table_entry_parses() {
    for (name, path) in CONNECTORS {
        let parsed: ConnectorName = name.parse().unwrap();
        assert_eq!(parsed.binding_path(), path);
        assert!(path.starts_with("connectors/"));
    }
}

#[test]
fn test05_aliases_share_bindings() {
    for (alias, target) in [
        ("bun", "bun-sqlite"),
        ("libsql", "libsql-node"),
        ("sqlite", "node-sqlite"),
    ] {
        assert_eq!(resolve_binding(alias), resolve_binding(target));
        assert_eq!(
            alias.parse::<ConnectorName>().unwrap().as_str(),
            target
        );
    }
}

#[test]
fn test05_unknown_name_errors() {
    let err = create_connector_by_name("db2", serde_json::Value::Null).unwrap_err();
    assert!(matches!(err, SqlConnectorError::UnknownConnector(ref n) if n == "db2"));
}

#[test]
fn test05_host_only_bindings_are_unimplemented() {
    for name in [ConnectorName::CloudflareD1, ConnectorName::Pglite] {
        assert_eq!(name.backend(), Backend::Unavailable);
        assert!(matches!(
            create_connector(name, serde_json::Value::Null),
            Err(SqlConnectorError::Unimplemented(_))
        ));
    }
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test05_config_builds_a_working_database() -> Result<(), SqlConnectorError> {
    let db = DatabaseConfig::from_json(
        r#"{ "connector": "better-sqlite3", "options": { "name": ":memory:" } }"#,
    )?
    .build()?;
    assert_eq!(db.dialect(), Dialect::Sqlite);
    assert_eq!(db.connector().name(), "better-sqlite3");

    db.exec("CREATE TABLE t (id INTEGER)").await?;
    db.sql(sql_template!("INSERT INTO t VALUES (", 1, ")")).await?;
    let res = db.sql("SELECT id FROM t").await?;
    assert_eq!(res.rows()[0].get("id"), Some(&RowValues::Int(1)));
    db.dispose().await
}

#[cfg(feature = "sqlite")]
#[test]
fn test05_config_reads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, r#"{ "connector": "sqlite3" }"#).unwrap();
    let config = DatabaseConfig::from_path(&path).unwrap();
    assert_eq!(config.connector, ConnectorName::Sqlite3);

    let missing = DatabaseConfig::from_path(dir.path().join("nope.json"));
    assert!(matches!(missing, Err(SqlConnectorError::ConfigError(_))));
}

#[cfg(feature = "postgres")]
#[test]
fn test05_postgres_names_share_the_driver() {
    let connector = create_connector_by_name(
        "cloudflare-hyperdrive-postgresql",
        serde_json::json!({ "url": "postgres://u:p@localhost/db" }),
    )
    .unwrap();
    assert_eq!(connector.name(), "cloudflare-hyperdrive-postgresql");
    assert_eq!(connector.dialect(), Dialect::Postgresql);
}

#[cfg(not(feature = "mysql"))]
#[test]
fn test05_disabled_feature_is_unimplemented() {
    let err = create_connector(ConnectorName::Mysql2, serde_json::Value::Null).unwrap_err();
    assert!(err.to_string().contains("mysql"));
}
