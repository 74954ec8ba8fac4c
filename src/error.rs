//! Error types for report normalization, the report store and rendering.
//!
//! Row-level problems (`FormatError`) are recovered by the pipeline: the row is
//! skipped and the render continues. Store failures (`StoreError`) abort the
//! whole render.

use thiserror::Error;

/// A report row that does not match the configured column layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("expected {expected} columns for generation {generation}, got {actual}")]
    ColumnCount {
        generation: u8,
        expected: usize,
        actual: usize,
    },

    #[error("field '{field}' is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("field '{field}' must not be negative: {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("field '{field}' is empty")]
    Empty { field: &'static str },

    #[error("malformed disk report '{0}'")]
    DiskReport(String),
}

/// Failure of the report store (unreachable, query failure, unreadable source).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("report store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed for host '{host}': {reason}")]
    Query { host: String, reason: String },

    #[error("stored report #{index} cannot be indexed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: FormatError,
    },
}

/// Outcome of a failed render. Only store failures are fatal.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("render aborted: {0}")]
    Store(#[from] StoreError),
}
