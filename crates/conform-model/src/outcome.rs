//! Per-case verdicts and per-rule outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::rule::Rule;

/// Result of scanning one case against one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The case does not count toward the rule's denominator.
    Ineligible,
    Compliant,
    /// First index at which the violation becomes determinable.
    Violated { index: usize },
}

impl Verdict {
    pub fn is_eligible(self) -> bool {
        !matches!(self, Verdict::Ineligible)
    }

    pub fn violation_index(self) -> Option<usize> {
        match self {
            Verdict::Violated { index } => Some(index),
            _ => None,
        }
    }
}

/// Case id to first violation index. Absent cases are compliant.
pub type ViolationRecord = BTreeMap<String, usize>;

/// Outcome of evaluating one rule over a whole log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: Rule,
    /// Number of cases eligible for the rule.
    pub cases_evaluated: usize,
    pub violations: usize,
    pub violation_record: ViolationRecord,
}

impl RuleOutcome {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            cases_evaluated: 0,
            violations: 0,
            violation_record: ViolationRecord::new(),
        }
    }

    /// Fold one case verdict into the counters.
    pub fn record(&mut self, case_id: &str, verdict: Verdict) {
        if !verdict.is_eligible() {
            return;
        }
        self.cases_evaluated += 1;
        if let Some(index) = verdict.violation_index() {
            self.violations += 1;
            self.violation_record.insert(case_id.to_string(), index);
        }
    }

    /// `100 * violations / cases_evaluated`, rounded to two decimals.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoEligibleCases`] when no case was eligible; this
    /// is distinct from a 0% violation rate.
    pub fn violation_percentage(&self) -> Result<f64> {
        if self.cases_evaluated == 0 {
            return Err(ModelError::NoEligibleCases {
                rule: self.rule.to_string(),
            });
        }
        let ratio = self.violations as f64 / self.cases_evaluated as f64;
        Ok((ratio * 100.0 * 100.0).round() / 100.0)
    }

    pub fn is_violated(&self, case_id: &str) -> bool {
        self.violation_record.contains_key(case_id)
    }

    /// Position column value for a case of length `case_len`.
    pub fn position_for(&self, case_id: &str, case_len: usize) -> usize {
        self.violation_record
            .get(case_id)
            .copied()
            .unwrap_or(case_len)
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        match self.violation_percentage() {
            Ok(percentage) => format!(
                "Conformance checking via {} with {} violations: {}% of all cases.",
                self.rule, self.violations, percentage
            ),
            Err(_) => format!(
                "Conformance checking via {}: no eligible cases.",
                self.rule
            ),
        }
    }
}

/// Composite label for one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeOutcome {
    /// `0`/`1` under flat composition, rule rank under hierarchical.
    pub y: u32,
    /// Earliest point at which the outcome is determinable.
    pub y_pos: usize,
}
