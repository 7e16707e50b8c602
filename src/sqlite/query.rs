use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};

use super::params::Params;
use crate::error::SqlConnectorError;
use crate::results::{ResultSet, RunResult};
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns the rusqlite error if the column cannot be read.
pub fn sqlite_extract_value(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> Result<RowValues, SqlConnectorError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Prepare `sql`, bind `params` and collect every returned row.
///
/// # Errors
/// Returns the rusqlite error from preparing, binding or stepping.
pub fn build_result_set(
    conn: &Connection,
    sql: &str,
    params: &Params,
) -> Result<ResultSet, SqlConnectorError> {
    let mut stmt = conn.prepare(sql)?;
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows = stmt.query(params_from_iter(params.as_values()))?;
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Execute `sql` for its side effects.
///
/// Row-producing statements are stepped to completion and report no changes.
///
/// # Errors
/// Returns the rusqlite error from preparing, binding or stepping.
pub fn execute_dml(
    conn: &Connection,
    sql: &str,
    params: &Params,
) -> Result<RunResult, SqlConnectorError> {
    let mut stmt = conn.prepare(sql)?;
    if stmt.column_count() > 0 {
        let mut rows = stmt.query(params_from_iter(params.as_values()))?;
        while rows.next()?.is_some() {}
        return Ok(RunResult::success());
    }
    let changes = stmt.execute(params_from_iter(params.as_values()))?;
    Ok(RunResult::success()
        .with_changes(changes as u64)
        .with_last_insert_rowid(conn.last_insert_rowid()))
}

/// Run one or more statements with no parameters.
///
/// No change count is reported: `sqlite3_changes` keeps the count of the
/// last DML statement, which may predate the batch.
///
/// # Errors
/// Returns the rusqlite error from the batch.
pub fn execute_batch(conn: &Connection, sql: &str) -> Result<RunResult, SqlConnectorError> {
    conn.execute_batch(sql)?;
    Ok(RunResult::success())
}
