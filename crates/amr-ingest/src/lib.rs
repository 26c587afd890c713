//! Loading of laboratory exports.
//!
//! - [`read_case_table`]: CSV file to a text-typed Polars `DataFrame`, with
//!   personally identifying columns removed before anything else sees them
//! - [`match_schema`]: locate the required columns and the recognized
//!   antibiotic columns, in input order

pub mod csv;
pub mod error;
pub mod schema;

pub use csv::{read_case_table, read_csv_headers};
pub use error::{IngestError, Result};
pub use schema::{CaseSchema, match_schema};
