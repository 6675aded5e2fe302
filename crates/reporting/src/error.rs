//! Report error types.

use store::StoreError;
use thiserror::Error;

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A date parameter is not in `YYYY-MM-DD` form.
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
