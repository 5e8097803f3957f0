//! Error types for the profiling pipeline.

use thiserror::Error;

/// Result type for profiler operations.
pub type ProfilerResult<T> = Result<T, ProfilerError>;

/// Errors that can surface from a profiling run.
///
/// Only structural failures propagate to the caller. Degraded conditions
/// (a missing optional capability, one column failing to parse, one chart
/// failing to render) are absorbed inside the pass that encounters them
/// and show up as placeholders or skip lists in the report instead.
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// The table has no columns, so no pass can produce meaningful output.
    #[error("Table has no columns to analyze")]
    EmptyTable,

    /// A referenced column does not exist in the table.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column holds a type the requested extraction cannot handle.
    #[error("Type mismatch for column '{column}': {message}")]
    TypeMismatch { column: String, message: String },

    /// Arrow computation error.
    #[error("Arrow computation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Filesystem error while preparing the output directory or writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration or parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Data type mismatch or invalid data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Generic profiler error with a custom message.
    #[error("{0}")]
    Custom(String),
}

impl ProfilerError {
    /// Creates a type mismatch error for the given column.
    pub fn type_mismatch(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error with the given message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates an invalid data error with the given message.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Creates a custom error with the given message.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Errors raised by a chart backend while rendering a single artifact.
///
/// These never escape the chart pass; each failed chart is recorded in the
/// report's chart section and the remaining charts are still attempted.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The chart cannot be built from the available columns.
    #[error("Chart not applicable: {0}")]
    NotApplicable(String),

    /// The backend failed to write the artifact.
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),

    /// The chart specification could not be serialized.
    #[error("Failed to serialize chart spec: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific rendering failure.
    #[error("Render failed: {0}")]
    Render(String),
}
