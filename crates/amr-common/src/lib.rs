//! Shared utilities for the antimicrobial resistance crates.
//!
//! This crate provides helpers used across the workspace: Polars value
//! extraction, percentage rounding and display formatting, and lenient
//! collection-date parsing.

pub mod date;
pub mod percent;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use date::{DEFAULT_DATE_FORMAT, day_gap, parse_collection_date};
pub use percent::{format_percentage, percentage, round_one_decimal};
pub use polars::{
    any_to_string, any_to_string_non_empty, column_string_values, column_value_string,
};
