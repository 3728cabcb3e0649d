pub mod case_view;
pub mod csv;
pub mod error;
pub mod polars_utils;
pub mod schema;
pub mod timestamp;

pub use case_view::CaseView;
pub use csv::{read_event_log, write_frame_csv};
pub use error::{IngestError, Result};
pub use polars_utils::{any_to_i64, any_to_string, parse_i64};
pub use schema::{
    ColumnLookup, DEFAULT_ACTIVITY_COLUMN, DEFAULT_CASE_ID_COLUMN, DEFAULT_TIMESTAMP_COLUMN,
    EventLogSchema, ResolvedSchema,
};
pub use timestamp::parse_timestamp;
