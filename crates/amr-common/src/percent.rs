//! Percentage rounding and display formatting.

/// Round to one decimal place, half away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of `part` in `whole` as a percentage rounded to one decimal.
///
/// Returns `None` when `whole` is zero: an empty denominator has no
/// percentage, which is different from a zero percentage.
///
/// # Examples
///
/// ```
/// use amr_common::percentage;
///
/// assert_eq!(percentage(3, 10), Some(30.0));
/// assert_eq!(percentage(2, 3), Some(66.7));
/// assert_eq!(percentage(0, 0), None);
/// ```
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(round_one_decimal(part as f64 / whole as f64 * 100.0))
}

/// Format a percentage with one decimal, dropping a trailing zero decimal.
///
/// # Examples
///
/// ```
/// use amr_common::format_percentage;
///
/// assert_eq!(format_percentage(66.7), "66.7");
/// assert_eq!(format_percentage(40.0), "40");
/// assert_eq!(format_percentage(100.0), "100");
/// assert_eq!(format_percentage(0.0), "0");
/// ```
pub fn format_percentage(value: f64) -> String {
    let s = format!("{value:.1}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
