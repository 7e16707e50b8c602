use sql_connector::RowValues;
use sql_connector::mssql::{TediousType, prepare_sql_parameters, tedious_data_type};

#[test]
fn test06_placeholders_number_from_one() {
    let prepared = prepare_sql_parameters(
        "INSERT INTO t (a, b, c, d) VALUES (?, ?, ?, ?)",
        &[
            RowValues::Int(1),
            RowValues::Float(1.5),
            RowValues::Text("x".into()),
            RowValues::Bool(false),
        ],
    );
    assert_eq!(
        prepared.sql,
        "INSERT INTO t (a, b, c, d) VALUES (@1, @2, @3, @4)"
    );
    let types: Vec<_> = prepared.parameters.iter().map(|p| p.data_type).collect();
    assert_eq!(
        types,
        vec![
            TediousType::Int,
            TediousType::Float,
            TediousType::NVarChar,
            TediousType::Bit
        ]
    );
    let names: Vec<_> = prepared.parameters.iter().map(|p| p.key()).collect();
    assert_eq!(names, vec!["@1", "@2", "@3", "@4"]);
}

#[test]
fn test06_whole_floats_narrow_like_integers() {
    assert_eq!(tedious_data_type(Some(&RowValues::Float(3.0))), TediousType::Int);
    assert_eq!(
        tedious_data_type(Some(&RowValues::Float(5_000_000_000.0))),
        TediousType::BigInt
    );
    assert_eq!(tedious_data_type(Some(&RowValues::Float(0.25))), TediousType::Float);
}

#[test]
fn test06_extra_values_are_ignored() {
    let prepared = prepare_sql_parameters("SELECT ?", &[RowValues::Int(1), RowValues::Int(2)]);
    assert_eq!(prepared.parameters.len(), 1);
    assert!(prepared.parameter("@2").is_none());
}
