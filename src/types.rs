use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::SqlConnectorError;

/// Values that can be used as query parameters or read back from a row.
///
/// The same enum is shared by every connector, so callers never branch on
/// driver types:
/// ```rust
/// use sql_connector::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// String form used when a value is spliced directly into SQL text.
impl fmt::Display for RowValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValues::Int(i) => write!(f, "{i}"),
            RowValues::Float(v) => write_float(f, *v),
            RowValues::Text(s) => f.write_str(s),
            RowValues::Bool(b) => write!(f, "{b}"),
            RowValues::Timestamp(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            RowValues::Null => f.write_str("null"),
            RowValues::JSON(v) => write!(f, "{v}"),
            RowValues::Blob(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

/// Shortest decimal form, switching to exponent notation outside
/// `1e-6 <= |v| < 1e21` (`1e+21`, `1.5e-7`), with `Infinity`, `-Infinity`
/// and `NaN` for the non-finite values.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if v == 0.0 {
        return f.write_str("0");
    }
    let magnitude = v.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{v}");
    }
    let exp = format!("{v:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => write!(f, "{mantissa}e+{power}"),
        _ => f.write_str(&exp),
    }
}

impl Serialize for RowValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowValues::Int(i) => serializer.serialize_i64(*i),
            RowValues::Float(v) => serializer.serialize_f64(*v),
            RowValues::Text(s) => serializer.serialize_str(s),
            RowValues::Bool(b) => serializer.serialize_bool(*b),
            RowValues::Timestamp(dt) => {
                serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
            RowValues::Null => serializer.serialize_none(),
            RowValues::JSON(v) => v.serialize(serializer),
            RowValues::Blob(bytes) => bytes.serialize(serializer),
        }
    }
}

macro_rules! row_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RowValues {
                fn from(value: $ty) -> Self {
                    RowValues::Int(i64::from(value))
                }
            }
        )*
    };
}

row_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for RowValues {
    fn from(value: f32) -> Self {
        RowValues::Float(f64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<&String> for RowValues {
    fn from(value: &String) -> Self {
        RowValues::Text(value.clone())
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl From<&[u8]> for RowValues {
    fn from(value: &[u8]) -> Self {
        RowValues::Blob(value.to_vec())
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

impl From<&RowValues> for RowValues {
    fn from(value: &RowValues) -> Self {
        value.clone()
    }
}

/// SQL flavour of a connector. Controls statement classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Mysql,
    Postgresql,
    Sqlite,
    Libsql,
    Mssql,
}

impl Dialect {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Postgresql => "postgresql",
            Dialect::Sqlite => "sqlite",
            Dialect::Libsql => "libsql",
            Dialect::Mssql => "mssql",
        }
    }

    /// Dialects whose `RETURNING` clauses hand back rows.
    #[must_use]
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::Postgresql | Dialect::Sqlite)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = SqlConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Dialect::Mysql),
            "postgresql" => Ok(Dialect::Postgresql),
            "sqlite" => Ok(Dialect::Sqlite),
            "libsql" => Ok(Dialect::Libsql),
            "mssql" => Ok(Dialect::Mssql),
            other => Err(SqlConnectorError::ConfigError(format!(
                "unknown dialect: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_splice_form() {
        assert_eq!(RowValues::from("users").to_string(), "users");
        assert_eq!(RowValues::Int(42).to_string(), "42");
        assert_eq!(RowValues::Float(1.5).to_string(), "1.5");
        assert_eq!(RowValues::Float(2.0).to_string(), "2");
        assert_eq!(RowValues::Bool(false).to_string(), "false");
        assert_eq!(RowValues::Null.to_string(), "null");
    }

    #[test]
    fn float_splice_edge_cases() {
        assert_eq!(RowValues::Float(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(RowValues::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(RowValues::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(RowValues::Float(-0.0).to_string(), "0");
        assert_eq!(RowValues::Float(1e21).to_string(), "1e+21");
        assert_eq!(RowValues::Float(-2.5e22).to_string(), "-2.5e+22");
        assert_eq!(RowValues::Float(1.5e-7).to_string(), "1.5e-7");
        assert_eq!(RowValues::Float(1e20).to_string(), "100000000000000000000");
        assert_eq!(RowValues::Float(0.000_001).to_string(), "0.000001");
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(RowValues::from(None::<i32>), RowValues::Null);
        assert_eq!(RowValues::from(Some("x")), RowValues::Text("x".into()));
    }

    #[test]
    fn serializes_as_plain_json() {
        let values = vec![
            RowValues::Int(1),
            RowValues::Text("a".into()),
            RowValues::Null,
            RowValues::Bool(true),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1,"a",null,true]"#);
    }

    #[test]
    fn dialect_round_trips_through_str() {
        for dialect in Dialect::value_variants() {
            assert_eq!(dialect.as_str().parse::<Dialect>().unwrap(), *dialect);
        }
        assert!(Dialect::Postgresql.supports_returning());
        assert!(Dialect::Sqlite.supports_returning());
        assert!(!Dialect::Libsql.supports_returning());
        assert!(!Dialect::Mysql.supports_returning());
    }
}
