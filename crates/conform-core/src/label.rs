//! Projection of rule outcomes back onto event rows.

use std::time::Instant;

use conform_ingest::CaseView;
use conform_model::{Rule, RuleOutcome};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{info, info_span};

use crate::error::{CheckError, Result};

/// Column pair holding one rule's labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelColumns {
    pub flag: String,
    pub position: String,
}

/// An event log with one flag/position column pair per labeled rule.
///
/// Column names derive from the rule, but the log owns the mapping: a name
/// already used by a source column or another rule gets a numeric suffix.
#[derive(Debug, Clone)]
pub struct LabeledLog {
    data: DataFrame,
    labels: Vec<Rule>,
    columns: Vec<LabelColumns>,
}

impl LabeledLog {
    pub fn new(data: DataFrame) -> Self {
        Self {
            data,
            labels: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_data(self) -> DataFrame {
        self.data
    }

    /// Rules labeled so far, in labeling order.
    pub fn labels(&self) -> &[Rule] {
        &self.labels
    }

    pub fn is_labeled(&self, rule: &Rule) -> bool {
        self.labels.contains(rule)
    }

    /// Columns holding the labels of `rule`, if it has been labeled.
    pub fn columns_of(&self, rule: &Rule) -> Option<&LabelColumns> {
        self.labels
            .iter()
            .position(|labeled| labeled == rule)
            .map(|idx| &self.columns[idx])
    }

    /// Every rule column pair, in labeling order.
    pub fn label_columns(&self) -> &[LabelColumns] {
        &self.columns
    }

    fn is_taken(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|column| column.as_str() == name)
    }

    fn allocate_columns(&self, rule: &Rule) -> LabelColumns {
        let flag = rule.flag_column();
        let position = rule.position_column();
        let mut ordinal = 1usize;
        loop {
            let candidate = if ordinal == 1 {
                LabelColumns {
                    flag: flag.clone(),
                    position: position.clone(),
                }
            } else {
                LabelColumns {
                    flag: format!("{flag}_{ordinal}"),
                    position: format!("{position}_{ordinal}"),
                }
            };
            if !self.is_taken(&candidate.flag) && !self.is_taken(&candidate.position) {
                return candidate;
            }
            ordinal += 1;
        }
    }

    /// Append the flag and position columns for `outcome`.
    ///
    /// The flag is `1` on every row of a violating case and `0` otherwise. The
    /// position is the first violation index, or the case length for cases
    /// without a violation. Labeling the same rule again overwrites its own
    /// pair; existing log columns are never replaced.
    ///
    /// # Errors
    ///
    /// Fails if `view` was not built from this log.
    pub fn label(&mut self, view: &CaseView, outcome: &RuleOutcome) -> Result<()> {
        let span = info_span!("label", rule = %outcome.rule);
        let _guard = span.enter();
        let start = Instant::now();

        if view.event_count() != self.data.height() {
            return Err(CheckError::DataFrame {
                message: format!(
                    "case view covers {} events but the log has {} rows",
                    view.event_count(),
                    self.data.height()
                ),
            });
        }

        let height = self.data.height();
        let mut flags: Vec<i64> = Vec::with_capacity(height);
        let mut positions: Vec<i64> = Vec::with_capacity(height);
        for row in 0..height {
            let case = &view.cases()[view.case_of_row(row)];
            flags.push(i64::from(outcome.is_violated(&case.id)));
            positions.push(outcome.position_for(&case.id, case.len()) as i64);
        }

        let columns = match self.columns_of(&outcome.rule) {
            Some(columns) => columns.clone(),
            None => {
                let columns = self.allocate_columns(&outcome.rule);
                self.labels.push(outcome.rule.clone());
                self.columns.push(columns.clone());
                columns
            }
        };
        let flag_column = columns.flag;
        let position_column = columns.position;
        self.data
            .with_column(Series::new(flag_column.as_str().into(), flags))?;
        self.data
            .with_column(Series::new(position_column.as_str().into(), positions))?;

        info!(
            rows = height,
            flag_column = %flag_column,
            position_column = %position_column,
            duration_ms = start.elapsed().as_millis(),
            "rule labeled"
        );
        Ok(())
    }
}
