use libsql::Value;

use crate::types::RowValues;

/// Owned libsql parameter list.
#[derive(Debug, Clone, Default)]
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Params {
        Params(
            params
                .iter()
                .map(|param| match param {
                    RowValues::Int(i) => Value::Integer(*i),
                    RowValues::Float(f) => Value::Real(*f),
                    RowValues::Text(s) => Value::Text(s.clone()),
                    RowValues::Bool(b) => Value::Integer(i64::from(*b)),
                    RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
                    RowValues::Null => Value::Null,
                    RowValues::JSON(jval) => Value::Text(jval.to_string()),
                    RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}
