#![allow(dead_code)]

use conform_ingest::any_to_i64;
use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};

pub fn test_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| {
            Series::new(
                name.into(),
                values.iter().copied().map(String::from).collect::<Vec<_>>(),
            )
            .into_column()
        })
        .collect();
    DataFrame::new(cols).unwrap()
}

/// Three cases, rows interleaved:
/// - `c1`: a b c d e X g
/// - `c2`: a b
/// - `c3`: a b c d
pub fn sample_log() -> DataFrame {
    let rows = [
        ("c1", "a"),
        ("c2", "a"),
        ("c1", "b"),
        ("c3", "a"),
        ("c1", "c"),
        ("c2", "b"),
        ("c3", "b"),
        ("c1", "d"),
        ("c3", "c"),
        ("c1", "e"),
        ("c3", "d"),
        ("c1", "X"),
        ("c1", "g"),
    ];
    test_df(vec![
        (
            "case:concept:name",
            rows.iter().map(|(case, _)| *case).collect(),
        ),
        (
            "concept:name",
            rows.iter().map(|(_, activity)| *activity).collect(),
        ),
    ])
}

pub fn int_column(df: &DataFrame, name: &str) -> Vec<i64> {
    let column = df.column(name).unwrap();
    (0..df.height())
        .map(|idx| any_to_i64(column.get(idx).unwrap_or(AnyValue::Null)).unwrap())
        .collect()
}

pub fn string_column(df: &DataFrame, name: &str) -> Vec<String> {
    let column = df.column(name).unwrap();
    (0..df.height())
        .map(|idx| conform_ingest::any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}
