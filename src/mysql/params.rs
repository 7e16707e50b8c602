use chrono::{Datelike, Timelike};
use mysql_async::{Params as MysqlParams, Value};

use crate::error::SqlConnectorError;
use crate::types::RowValues;

/// Convert a single `RowValues` to a mysql `Value`.
///
/// # Errors
/// Returns `ParameterError` for a timestamp outside MySQL's year range.
#[allow(clippy::cast_possible_truncation)]
pub fn row_value_to_mysql_value(value: &RowValues) -> Result<Value, SqlConnectorError> {
    Ok(match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.clone().into_bytes()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        RowValues::Timestamp(dt) => {
            let year = u16::try_from(dt.year()).map_err(|_| {
                SqlConnectorError::ParameterError(format!("timestamp year out of range: {dt}"))
            })?;
            Value::Date(
                year,
                dt.month() as u8,
                dt.day() as u8,
                dt.hour() as u8,
                dt.minute() as u8,
                dt.second() as u8,
                dt.nanosecond() / 1_000,
            )
        }
        RowValues::Null => Value::NULL,
        RowValues::JSON(jval) => Value::Bytes(jval.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
    })
}

/// Positional parameters for `exec_*` calls.
///
/// # Errors
/// Returns the first conversion failure.
pub fn convert(params: &[RowValues]) -> Result<MysqlParams, SqlConnectorError> {
    if params.is_empty() {
        return Ok(MysqlParams::Empty);
    }
    let values = params
        .iter()
        .map(row_value_to_mysql_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MysqlParams::Positional(values))
}
