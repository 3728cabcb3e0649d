//! Error types for rule evaluation, composition and encoding.

use conform_ingest::IngestError;
use conform_model::ModelError;
use thiserror::Error;

/// Errors raised by the labeling engine.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Invalid rule or degenerate outcome.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Schema or case view failure.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    // === Composition Errors ===
    /// Composition was requested over no rules.
    #[error("composition requires at least one rule")]
    EmptyRuleList,

    /// Hierarchical composition without any priority entries.
    #[error("hierarchical composition requires a non-empty priority order")]
    MissingPriorityOrder,

    /// A rule used for composition has not been labeled onto the log.
    #[error("{rule} has not been labeled onto the log")]
    UnlabeledRule { rule: String },

    /// The log already carries a column the encoder writes.
    #[error("log column '{column}' clashes with an encoded output column")]
    ReservedColumn { column: String },

    // === Scan Errors ===
    /// An event of an eligible case carries no timestamp.
    #[error("case '{case_id}' has no timestamp at position {position}")]
    MissingTimestamp { case_id: String, position: usize },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for CheckError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, CheckError>;
