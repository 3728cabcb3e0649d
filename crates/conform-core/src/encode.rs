//! Prefix encoding: truncate every case to the events known before its outcome.

use std::time::Instant;

use conform_ingest::CaseView;
use conform_model::EncodeOptions;
use polars::prelude::{BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, Series};
use tracing::{debug, info, info_span};

use crate::compose::Composition;
use crate::error::{CheckError, Result};
use crate::label::LabeledLog;

/// Label column attached to every retained row.
pub const LABEL_COLUMN: &str = "y";
/// Composite position column, kept when requested.
pub const LABEL_POSITION_COLUMN: &str = "y_pos";
/// 0-based position of each row within its case.
pub const EVENT_INDEX_COLUMN: &str = "event_index";
/// Reduced cutoff of each row's case.
pub const CUTOFF_COLUMN: &str = "cutoff";

/// Columns added by the encoder; a log must not already carry any of them.
pub const RESERVED_COLUMNS: [&str; 4] = [
    LABEL_COLUMN,
    LABEL_POSITION_COLUMN,
    EVENT_INDEX_COLUMN,
    CUTOFF_COLUMN,
];

/// Reject a log whose columns clash with the encoder's output columns.
///
/// # Errors
///
/// Returns [`CheckError::ReservedColumn`] for the first clashing column.
pub fn check_reserved_columns(df: &DataFrame) -> Result<()> {
    let clash = df
        .get_column_names()
        .into_iter()
        .find(|name| RESERVED_COLUMNS.contains(&name.as_str()));
    match clash {
        Some(column) => Err(CheckError::ReservedColumn {
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

/// Build the prefix dataset from a composition.
///
/// For every case `cutoff = y_pos - prefix_reduction`. Cases with a cutoff
/// below `min_trace_length`, or above the configured maximum, are dropped.
/// Surviving cases keep the rows with a position strictly below the cutoff.
/// Filtering everything out yields an empty frame, not an error.
///
/// # Errors
///
/// Fails when the log already has a reserved output column, or on a
/// DataFrame operation.
pub fn encode_prefixes(
    labeled: &LabeledLog,
    view: &CaseView,
    composition: &Composition,
    options: &EncodeOptions,
) -> Result<DataFrame> {
    let span = info_span!("encode", prefix_reduction = options.prefix_reduction);
    let _guard = span.enter();
    let start = Instant::now();

    check_reserved_columns(labeled.data())?;
    let min_cutoff = options.min_trace_length as i64;
    let max_cutoff = options.max_cutoff();
    let reduction = options.prefix_reduction as i64;

    let mut case_cutoffs: Vec<Option<(i64, i64, i64)>> = Vec::with_capacity(view.len());
    for case in view.cases() {
        let entry = composition.get(&case.id).and_then(|outcome| {
            let y_pos = outcome.y_pos as i64;
            let cutoff = y_pos - reduction;
            let within = cutoff >= min_cutoff && max_cutoff.is_none_or(|max| cutoff <= max);
            if !within {
                debug!(case_id = %case.id, cutoff, "case dropped by length filter");
            }
            within.then_some((i64::from(outcome.y), y_pos, cutoff))
        });
        case_cutoffs.push(entry);
    }
    let kept_cases = case_cutoffs.iter().filter(|entry| entry.is_some()).count();

    let height = view.event_count();
    let mut keep = Vec::with_capacity(height);
    let mut labels = Vec::with_capacity(height);
    let mut label_positions = Vec::with_capacity(height);
    let mut event_indexes = Vec::with_capacity(height);
    let mut cutoffs = Vec::with_capacity(height);
    for row in 0..height {
        let position = view.position_of_row(row) as i64;
        let entry = case_cutoffs[view.case_of_row(row)];
        keep.push(entry.is_some_and(|(_, _, cutoff)| position < cutoff));
        labels.push(entry.map(|(y, _, _)| y));
        label_positions.push(entry.map(|(_, y_pos, _)| y_pos));
        event_indexes.push(position);
        cutoffs.push(entry.map(|(_, _, cutoff)| cutoff));
    }

    let mut df = labeled.data().clone();
    df.with_column(Series::new(LABEL_COLUMN.into(), labels))?;
    df.with_column(Series::new(LABEL_POSITION_COLUMN.into(), label_positions))?;
    df.with_column(Series::new(EVENT_INDEX_COLUMN.into(), event_indexes))?;
    df.with_column(Series::new(CUTOFF_COLUMN.into(), cutoffs))?;
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let mut df = df.filter(&mask)?;

    if !options.keep_y_pos {
        df = df.drop(LABEL_POSITION_COLUMN)?;
    }
    if options.drop_helper_columns {
        df = df.drop(EVENT_INDEX_COLUMN)?;
        df = df.drop(CUTOFF_COLUMN)?;
        for columns in labeled.label_columns() {
            df = df.drop(&columns.flag)?;
            df = df.drop(&columns.position)?;
        }
    }

    info!(
        cases = view.len(),
        kept_cases,
        rows = df.height(),
        duration_ms = start.elapsed().as_millis(),
        "prefixes encoded"
    );
    Ok(df)
}
