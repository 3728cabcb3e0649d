use std::path::PathBuf;

use conform_model::RuleOutcome;

#[derive(Debug)]
pub struct LabelResult {
    pub log_path: PathBuf,
    pub cases: usize,
    pub events: usize,
    pub rules: Vec<RuleReport>,
    /// Cases with a non-zero composite label, when the log was labeled.
    pub positive_cases: Option<usize>,
    /// Rows of the prefix dataset, when encoding ran.
    pub encoded_rows: Option<usize>,
    pub outputs: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct RuleReport {
    pub outcome: RuleOutcome,
    /// `None` when no case was eligible.
    pub percentage: Option<f64>,
}
