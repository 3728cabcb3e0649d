//! Read-only projection of an event log into per-case event sequences.

use std::collections::HashMap;

use conform_model::{Case, Event};
use polars::prelude::{AnyValue, DataFrame};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::polars_utils::any_to_string;
use crate::schema::ResolvedSchema;
use crate::timestamp::parse_timestamp;

/// Events grouped by case id, in original row order.
///
/// Cases appear in order of their first row. The view also remembers, for
/// every row of the source frame, which case it belongs to and its position
/// within that case, so per-case results can be projected back onto rows.
#[derive(Debug, Clone, Default)]
pub struct CaseView {
    cases: Vec<Case>,
    index: HashMap<String, usize>,
    rows_by_case: Vec<Vec<usize>>,
    row_case: Vec<usize>,
    row_position: Vec<usize>,
}

impl CaseView {
    /// Group the rows of `df` by case id.
    ///
    /// No reordering, filtering or deduplication takes place.
    ///
    /// # Errors
    ///
    /// Fails if a resolved column cannot be read or, when timestamps were
    /// resolved, a non-empty timestamp value cannot be parsed.
    pub fn from_frame(df: &DataFrame, schema: &ResolvedSchema) -> Result<Self> {
        let case_series = df.column(&schema.case_id)?;
        let activity_series = df.column(&schema.activity)?;
        let timestamp_series = match &schema.timestamp {
            Some(column) => Some(df.column(column)?),
            None => None,
        };

        let mut view = Self::default();
        for row in 0..df.height() {
            let case_id = any_to_string(case_series.get(row).unwrap_or(AnyValue::Null));
            let activity = any_to_string(activity_series.get(row).unwrap_or(AnyValue::Null));
            let timestamp = match timestamp_series {
                Some(series) => {
                    let raw = any_to_string(series.get(row).unwrap_or(AnyValue::Null));
                    if raw.trim().is_empty() {
                        None
                    } else {
                        let parsed = parse_timestamp(&raw)
                            .ok_or(IngestError::InvalidTimestamp { row, value: raw })?;
                        Some(parsed)
                    }
                }
                None => None,
            };
            view.push(row, case_id, activity, timestamp);
        }
        debug!(
            cases = view.len(),
            events = view.event_count(),
            "case view built"
        );
        Ok(view)
    }

    /// Build a view directly from cases, one row per event in case order.
    pub fn from_cases(cases: impl IntoIterator<Item = Case>) -> Self {
        let mut view = Self::default();
        let mut row = 0;
        for case in cases {
            for event in case.events {
                view.push(row, case.id.clone(), event.activity, event.timestamp);
                row += 1;
            }
        }
        view
    }

    fn push(
        &mut self,
        row: usize,
        case_id: String,
        activity: String,
        timestamp: Option<chrono::NaiveDateTime>,
    ) {
        let case_idx = match self.index.get(&case_id) {
            Some(idx) => *idx,
            None => {
                let idx = self.cases.len();
                self.index.insert(case_id.clone(), idx);
                self.cases.push(Case {
                    id: case_id.clone(),
                    events: Vec::new(),
                });
                self.rows_by_case.push(Vec::new());
                idx
            }
        };
        let case = &mut self.cases[case_idx];
        let position = case.events.len();
        case.events.push(Event {
            case_id,
            activity,
            position,
            timestamp,
        });
        self.rows_by_case[case_idx].push(row);
        self.row_case.push(case_idx);
        self.row_position.push(position);
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn case(&self, case_id: &str) -> Option<&Case> {
        self.index.get(case_id).map(|idx| &self.cases[*idx])
    }

    /// Number of distinct cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Number of events (rows) across all cases.
    pub fn event_count(&self) -> usize {
        self.row_case.len()
    }

    /// Source rows of the case at `case_idx`, in order.
    pub fn rows_of(&self, case_idx: usize) -> &[usize] {
        &self.rows_by_case[case_idx]
    }

    /// Index into [`CaseView::cases`] of the case owning `row`.
    pub fn case_of_row(&self, row: usize) -> usize {
        self.row_case[row]
    }

    /// 0-based position of `row` within its case.
    pub fn position_of_row(&self, row: usize) -> usize {
        self.row_position[row]
    }
}
