//! Row access helpers over text-typed case frames.

use amr_common::column_string_values;
use polars::prelude::{DataFrame, IdxCa, IdxSize, PolarsResult};

/// Values of an optional role column; a missing role reads as all null.
pub(crate) fn role_values(df: &DataFrame, column: Option<&str>) -> Vec<Option<String>> {
    match column {
        Some(name) => column_string_values(df, name),
        None => vec![None; df.height()],
    }
}

/// Rows in `order`, as a new frame.
pub(crate) fn take_rows(df: &DataFrame, order: &[usize]) -> PolarsResult<DataFrame> {
    let idx: Vec<IdxSize> = order.iter().map(|&row| row as IdxSize).collect();
    df.take(&IdxCa::from_vec("row".into(), idx))
}
