//! Error types for the analysis stages.

use thiserror::Error;

/// Analysis never fails on malformed data; only frame operations can fail.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for CoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, CoreError>;
