//! Placeholder rewriting and parameter typing for SQL Server.
//!
//! Every `?` in the statement becomes `@1`, `@2`, ... in order, and each
//! value gets the SQL Server type it will be declared with.

use crate::types::RowValues;

/// SQL Server parameter type chosen for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TediousType {
    NVarChar,
    Int,
    BigInt,
    Float,
    Bit,
    DateTime2,
    VarBinary,
}

impl TediousType {
    /// Type name as written in a `sp_executesql` parameter declaration.
    #[must_use]
    pub fn sql_declaration(self) -> &'static str {
        match self {
            TediousType::NVarChar => "nvarchar(max)",
            TediousType::Int => "int",
            TediousType::BigInt => "bigint",
            TediousType::Float => "float",
            TediousType::Bit => "bit",
            TediousType::DateTime2 => "datetime2",
            TediousType::VarBinary => "varbinary(max)",
        }
    }
}

fn integer_type(value: i64) -> TediousType {
    if value < i64::from(i32::MIN) || value > i64::from(i32::MAX) {
        TediousType::BigInt
    } else {
        TediousType::Int
    }
}

/// Infer the parameter type for `value`. A missing value is typed like `NULL`.
///
/// Integral floats are typed as integers, the same as integer values.
#[must_use]
pub fn tedious_data_type(value: Option<&RowValues>) -> TediousType {
    match value {
        None | Some(RowValues::Null | RowValues::Text(_)) => TediousType::NVarChar,
        Some(RowValues::Int(i)) => integer_type(*i),
        Some(RowValues::Float(f)) if f.fract() == 0.0 => {
            if *f < f64::from(i32::MIN) || *f > f64::from(i32::MAX) {
                TediousType::BigInt
            } else {
                TediousType::Int
            }
        }
        Some(RowValues::Float(_)) => TediousType::Float,
        Some(RowValues::Bool(_)) => TediousType::Bit,
        Some(RowValues::Timestamp(_)) => TediousType::DateTime2,
        Some(RowValues::Blob(_)) => TediousType::VarBinary,
        Some(RowValues::JSON(_)) => TediousType::NVarChar,
    }
}

/// One named parameter produced by [`prepare_sql_parameters`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedParameter {
    /// Index as a string, without the `@` (`"1"` for `@1`).
    pub name: String,
    pub data_type: TediousType,
    pub value: RowValues,
}

impl PreparedParameter {
    /// Name as it appears in the rewritten SQL, e.g. `@1`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("@{}", self.name)
    }
}

/// Rewritten SQL plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSql {
    pub sql: String,
    pub parameters: Vec<PreparedParameter>,
}

impl PreparedSql {
    /// Look a parameter up by its `@N` key.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&PreparedParameter> {
        let name = key.strip_prefix('@')?;
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Replace every `?` with `@1`, `@2`, ... and pair each with its value.
///
/// Every `?` counts, including ones inside string literals. Placeholders
/// without a matching value get `NULL`; extra values are ignored.
#[must_use]
pub fn prepare_sql_parameters(sql: &str, parameters: &[RowValues]) -> PreparedSql {
    let mut rewritten = String::with_capacity(sql.len() + 8);
    let mut prepared = Vec::new();

    for ch in sql.chars() {
        if ch != '?' {
            rewritten.push(ch);
            continue;
        }
        let index = prepared.len();
        let name = (index + 1).to_string();
        rewritten.push('@');
        rewritten.push_str(&name);
        let value = parameters.get(index);
        prepared.push(PreparedParameter {
            name,
            data_type: tedious_data_type(value),
            value: value.cloned().unwrap_or(RowValues::Null),
        });
    }

    PreparedSql {
        sql: rewritten,
        parameters: prepared,
    }
}
