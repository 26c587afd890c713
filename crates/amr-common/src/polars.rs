//! Polars value extraction helpers.
//!
//! Input tables are read with every column as text, but frames built in tests
//! or by other callers may carry numeric columns. These helpers turn any cell
//! into a trimmed string so the analysis code never branches on dtype.

use polars::prelude::{AnyValue, DataFrame};

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`. Floats that hold whole numbers are
/// rendered without a fractional part so numeric process identifiers read
/// the same as their text form.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use amr_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int64(1042)), "1042");
/// assert_eq!(any_to_string(AnyValue::Float64(1042.0)), "1042");
/// assert_eq!(any_to_string(AnyValue::String("Resistente")), "Resistente");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => float_to_string(f64::from(v)),
        AnyValue::Float64(v) => float_to_string(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

fn float_to_string(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

/// Converts `AnyValue` to a trimmed `String`, returning `None` when blank.
///
/// Blank cells are how the laboratory export marks an untested antibiotic.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Get a trimmed string value from a DataFrame column at the given row index.
///
/// A missing column reads as an empty string.
pub fn column_value_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null))
            .trim()
            .to_string(),
        Err(_) => String::new(),
    }
}

/// Extract every value of a column, blanks and nulls as `None`.
///
/// A missing column yields a vector of `None` with the frame's height.
pub fn column_string_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    let Ok(column) = df.column(name) else {
        return vec![None; df.height()];
    };
    (0..df.height())
        .map(|idx| any_to_string_non_empty(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom, Series};

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_whole_float() {
        assert_eq!(any_to_string(AnyValue::Float64(12.0)), "12");
        assert_eq!(any_to_string(AnyValue::Float64(12.5)), "12.5");
    }

    #[test]
    fn test_any_to_string_non_empty() {
        assert_eq!(any_to_string_non_empty(AnyValue::Null), None);
        assert_eq!(any_to_string_non_empty(AnyValue::String("  ")), None);
        assert_eq!(
            any_to_string_non_empty(AnyValue::String(" Sensível ")),
            Some("Sensível".to_string())
        );
    }

    #[test]
    fn test_column_string_values_missing_column() {
        let df = DataFrame::new(vec![Column::from(Series::new(
            "Microorganismo".into(),
            vec!["Escherichia coli", "Klebsiella pneumoniae"],
        ))])
        .unwrap();

        assert_eq!(column_string_values(&df, "Meropenem"), vec![None, None]);
        assert_eq!(column_value_string(&df, "Meropenem", 0), "");
        assert_eq!(
            column_value_string(&df, "Microorganismo", 1),
            "Klebsiella pneumoniae"
        );
    }

    #[test]
    fn test_column_string_values_blank_is_none() {
        let df = DataFrame::new(vec![Column::from(Series::new(
            "Meropenem".into(),
            vec![Some("Resistente"), Some(""), None],
        ))])
        .unwrap();

        assert_eq!(
            column_string_values(&df, "Meropenem"),
            vec![Some("Resistente".to_string()), None, None]
        );
    }
}
