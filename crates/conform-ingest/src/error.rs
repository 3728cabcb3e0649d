//! Error types for event log ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an event log or projecting it into cases.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Log file not found.
    #[error("event log not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to create or write an output file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to serialize a frame as CSV.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    // === Schema Errors ===
    /// A structural column declared by the schema is absent.
    #[error("required {role} column '{column}' not found in event log")]
    MissingColumn { role: &'static str, column: String },

    /// A timestamp-based rule is configured but the schema declares no timestamp column.
    #[error("timestamps are required but no timestamp column is configured")]
    TimestampColumnNotConfigured,

    /// A timestamp value could not be parsed.
    #[error("unparseable timestamp '{value}' in row {row}")]
    InvalidTimestamp { row: usize, value: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
