use std::sync::Arc;

use chrono::NaiveDate;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Params, Row, Value};

use crate::error::SqlConnectorError;
use crate::results::{ResultSet, RunResult};
use crate::types::RowValues;

/// Convert a mysql `Value` read from a row.
///
/// Byte strings that are valid UTF-8 come back as text.
#[must_use]
pub fn mysql_extract_value(value: &Value) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text.to_string()),
            Err(_) => RowValues::Blob(bytes.clone()),
        },
        Value::Int(i) => RowValues::Int(*i),
        Value::UInt(u) => i64::try_from(*u).map_or_else(|_| RowValues::Text(u.to_string()), RowValues::Int),
        Value::Float(f) => RowValues::Float(f64::from(*f)),
        Value::Double(f) => RowValues::Float(*f),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                })
                .map_or(RowValues::Null, RowValues::Timestamp)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u64::from(*days) * 24 + u64::from(*hours);
            RowValues::Text(format!(
                "{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
            ))
        }
    }
}

fn row_values(row: &Row) -> Vec<RowValues> {
    (0..row.len())
        .map(|idx| row.as_ref(idx).map_or(RowValues::Null, mysql_extract_value))
        .collect()
}

/// Execute a row-returning statement.
///
/// # Errors
/// Returns the driver error from execution or row streaming.
pub async fn execute_select(
    conn: &mut Conn,
    sql: &str,
    params: Params,
) -> Result<ResultSet, SqlConnectorError> {
    let mut result = conn.exec_iter(sql, params).await?;
    let column_names: Vec<String> = result
        .columns()
        .map(|columns| columns.iter().map(|c| c.name_str().into_owned()).collect())
        .unwrap_or_default();
    let rows: Vec<Row> = result.collect().await?;

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));
    for row in &rows {
        result_set.add_row_values(row_values(row));
    }
    Ok(result_set)
}

/// Execute a statement for its side effects.
///
/// # Errors
/// Returns the driver error from execution.
pub async fn execute_dml(
    conn: &mut Conn,
    sql: &str,
    params: Params,
) -> Result<RunResult, SqlConnectorError> {
    conn.exec_drop(sql, params).await?;
    let mut run = RunResult::success().with_changes(conn.affected_rows());
    if let Some(id) = conn.last_insert_id().and_then(|id| i64::try_from(id).ok()) {
        run = run.with_last_insert_rowid(id);
    }
    Ok(run)
}

/// Run text with no parameters, possibly several statements.
///
/// # Errors
/// Returns the driver error from execution.
pub async fn execute_batch(conn: &mut Conn, sql: &str) -> Result<RunResult, SqlConnectorError> {
    conn.query_drop(sql).await?;
    Ok(RunResult::success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_and_dates() {
        assert_eq!(
            mysql_extract_value(&Value::Bytes(b"hi".to_vec())),
            RowValues::Text("hi".into())
        );
        assert_eq!(
            mysql_extract_value(&Value::Bytes(vec![0xff, 0xfe])),
            RowValues::Blob(vec![0xff, 0xfe])
        );
        let date = mysql_extract_value(&Value::Date(2024, 1, 2, 3, 4, 5, 0));
        assert_eq!(date.to_string(), "2024-01-02 03:04:05");
        assert_eq!(
            mysql_extract_value(&Value::Time(false, 1, 2, 3, 4, 0)),
            RowValues::Text("26:03:04.000000".into())
        );
    }
}
