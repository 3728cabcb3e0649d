//! Declarative rule labeling and prefix encoding for event logs.

pub mod aggregate;
pub mod compose;
pub mod encode;
pub mod error;
pub mod label;
pub mod pipeline;
pub mod scan;

pub use aggregate::{evaluate_rule, evaluate_rules};
pub use compose::{Composition, compose, compose_rules, compose_single, validate_policy};
pub use encode::{
    CUTOFF_COLUMN, EVENT_INDEX_COLUMN, LABEL_COLUMN, LABEL_POSITION_COLUMN, RESERVED_COLUMNS,
    check_reserved_columns, encode_prefixes,
};
pub use error::{CheckError, Result};
pub use label::{LabelColumns, LabeledLog};
pub use pipeline::{LabelingPipeline, PipelineOutput};
pub use scan::{ScanState, scan_case};
