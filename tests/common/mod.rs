#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sql_connector::prelude::*;
use sql_connector::{CustomDbRow, StatementExecutor};

/// Which executor entry point a call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    All,
    Run,
    Exec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub route: Route,
    pub sql: String,
    pub params: Vec<RowValues>,
}

#[derive(Default)]
pub struct Log {
    pub calls: Mutex<Vec<Call>>,
    pub disposals: AtomicUsize,
    pub instances: AtomicUsize,
}

impl Log {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    fn record(&self, route: Route, sql: &str, params: &[RowValues]) {
        self.calls.lock().unwrap().push(Call {
            route,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }
}

struct RecordingExecutor {
    log: Arc<Log>,
}

#[async_trait]
impl StatementExecutor for RecordingExecutor {
    async fn all(&self, sql: &str, params: &[RowValues]) -> Result<ResultSet, SqlConnectorError> {
        self.log.record(Route::All, sql, params);
        let mut rs = ResultSet::with_capacity(1);
        rs.add_row(CustomDbRow::new(
            Arc::new(vec!["sql".to_string()]),
            vec![RowValues::Text(sql.to_string())],
        ));
        Ok(rs)
    }

    async fn run(&self, sql: &str, params: &[RowValues]) -> Result<RunResult, SqlConnectorError> {
        self.log.record(Route::Run, sql, params);
        Ok(RunResult::success().with_changes(1))
    }
}

/// In-process connector that records every call instead of talking to a driver.
#[derive(Clone)]
pub struct RecordingConnector {
    pub dialect: Dialect,
    pub log: Arc<Log>,
    executor: Arc<RecordingExecutor>,
}

impl RecordingConnector {
    pub fn new(dialect: Dialect) -> Self {
        let log = Arc::new(Log::default());
        Self {
            dialect,
            executor: Arc::new(RecordingExecutor { log: log.clone() }),
            log,
        }
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    type Instance = usize;

    fn name(&self) -> &str {
        "recording"
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn get_instance(&self) -> Result<usize, SqlConnectorError> {
        Ok(self.log.instances.fetch_add(1, Ordering::SeqCst))
    }

    async fn exec(&self, sql: &str) -> Result<SqlResult, SqlConnectorError> {
        self.log.record(Route::Exec, sql, &[]);
        Ok(SqlResult {
            success: true,
            ..SqlResult::default()
        })
    }

    fn prepare(&self, sql: &str) -> Statement {
        Statement::new(sql, self.executor.clone())
    }

    async fn dispose(&self) -> Result<(), SqlConnectorError> {
        self.log.disposals.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(())
    }
}
