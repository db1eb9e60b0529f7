//! Error handling for the analysis pipeline.

pub mod util;

use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors raised while loading, cleaning or aggregating loyalty data
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// An input location is missing or unreadable
    #[error("Source not found: {} ({reason})", path.display())]
    SourceNotFound {
        /// The location that could not be read
        path: PathBuf,
        /// Why the location could not be read
        reason: String,
    },

    /// An expected column is absent or holds an unknown category
    #[error("Schema error: {0}")]
    Schema(String),

    /// A value failed type coercion
    #[error("Parse error in column '{column}': cannot interpret '{value}'")]
    Parse {
        /// Column holding the value
        column: String,
        /// The raw value
        value: String,
    },

    /// Rows could not be converted into typed records
    #[error("Type conversion error: {0}")]
    Conversion(String),

    /// An aggregate was requested over a segment with no rows
    #[error("Empty segment: {0}")]
    EmptySegment(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error writing report artifacts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error (de)serializing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Create a schema error for a column that is not present in a relation
    #[must_use]
    pub fn missing_column(relation: &str, column: &str) -> Self {
        Self::Schema(format!(
            "expected column '{column}' is absent from the {relation} data"
        ))
    }

    /// Create a parse error for a raw value
    pub fn parse(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether the error aborts the run or is only reported
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Parse { .. } | Self::EmptySegment(_))
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
