use std::sync::Arc;

use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::{Query, Row};

use super::client::MssqlClient;
use super::params::{PreparedSql, TediousType};
use crate::error::SqlConnectorError;
use crate::results::{CustomDbRow, ResultSet};
use crate::types::RowValues;

/// Outer statement text and declaration list for an `sp_executesql` call.
///
/// tiberius names its own parameters `@P1..`, so the statement and the
/// declaration list travel as `@P1`/`@P2` and each value as `@P3` onward.
#[must_use]
pub fn sp_executesql_text(prepared: &PreparedSql) -> (String, String) {
    let declarations = prepared
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.key(), p.data_type.sql_declaration()))
        .collect::<Vec<_>>()
        .join(", ");
    let assignments = prepared
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} = @P{}", p.key(), i + 3))
        .collect::<Vec<_>>()
        .join(", ");
    (
        format!("EXEC sp_executesql @P1, @P2, {assignments}"),
        declarations,
    )
}

/// Wrap rewritten SQL in `sp_executesql` so the server sees `@1..@N`.
#[must_use]
pub fn build_request(prepared: &PreparedSql) -> Query<'static> {
    if prepared.parameters.is_empty() {
        return Query::new(prepared.sql.clone());
    }

    let (outer, declarations) = sp_executesql_text(prepared);
    let mut query = Query::new(outer);
    query.bind(prepared.sql.clone());
    query.bind(declarations);
    for parameter in &prepared.parameters {
        bind_typed(&mut query, parameter.data_type, &parameter.value);
    }
    query
}

#[allow(clippy::cast_possible_truncation)]
fn bind_typed(query: &mut Query<'static>, data_type: TediousType, value: &RowValues) {
    match (data_type, value) {
        (_, RowValues::Null) => query.bind(Option::<String>::None),
        (TediousType::Int, RowValues::Int(i)) => query.bind(*i as i32),
        (TediousType::Int, RowValues::Float(f)) => query.bind(*f as i32),
        (TediousType::BigInt, RowValues::Int(i)) => query.bind(*i),
        (TediousType::BigInt, RowValues::Float(f)) => query.bind(*f as i64),
        (TediousType::Float, RowValues::Float(f)) => query.bind(*f),
        (TediousType::Bit, RowValues::Bool(b)) => query.bind(*b),
        (TediousType::DateTime2, RowValues::Timestamp(dt)) => query.bind(*dt),
        (TediousType::VarBinary, RowValues::Blob(bytes)) => query.bind(bytes.clone()),
        (_, RowValues::Text(s)) => query.bind(s.clone()),
        (_, other) => query.bind(other.to_string()),
    }
}

/// Extract a value from a row at a specific index
fn extract_value(row: &Row, idx: usize) -> RowValues {
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return RowValues::Int(val);
    }
    if let Ok(Some(val)) = row.try_get::<i16, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<u8, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return RowValues::Float(f64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return RowValues::Float(val);
    }
    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return RowValues::Bool(val);
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return RowValues::Timestamp(val);
    }
    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return RowValues::Text(val.to_string());
    }
    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return RowValues::Blob(val.to_vec());
    }
    RowValues::Null
}

fn row_column_names(row: &Row) -> Arc<Vec<String>> {
    Arc::new(row.columns().iter().map(|col| col.name().to_string()).collect())
}

/// Run a prepared request and collect rows from every result set, mapping
/// each row's columns by name.
///
/// # Errors
/// Returns the driver error from execution or row streaming.
pub async fn build_result_set(
    client: &mut MssqlClient,
    prepared: &PreparedSql,
) -> Result<ResultSet, SqlConnectorError> {
    let stream = if prepared.parameters.is_empty() {
        client.simple_query(prepared.sql.clone()).await?
    } else {
        build_request(prepared).query(client).await?
    };
    let mut rows = stream.into_row_stream();

    let mut result_set = ResultSet::with_capacity(10);
    // (result index, column names) of the result set currently streaming
    let mut current: Option<(usize, Arc<Vec<String>>)> = None;
    while let Some(row) = rows.try_next().await? {
        let column_names = match &current {
            Some((index, names)) if *index == row.result_index() => Arc::clone(names),
            _ => {
                let names = row_column_names(&row);
                current = Some((row.result_index(), Arc::clone(&names)));
                names
            }
        };
        let values = (0..column_names.len())
            .map(|idx| extract_value(&row, idx))
            .collect();
        result_set.add_row(CustomDbRow::new(column_names, values));
    }

    Ok(result_set)
}
