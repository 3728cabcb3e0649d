//! Configuration options for rule checking, composition and prefix encoding.

use serde::{Deserialize, Serialize};

use crate::rule::Rule;

/// Index reported for violations that only become decidable once a trace ends
/// (lower cardinality bound, unanswered responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalIndex {
    /// Report `len(case)`: the violation sits right after the last event.
    #[default]
    TraceLength,
    /// Report `len(case) - 1`: the violation sits on the last event.
    LastEvent,
}

impl TerminalIndex {
    pub fn resolve(self, case_len: usize) -> usize {
        match self {
            TerminalIndex::TraceLength => case_len,
            TerminalIndex::LastEvent => case_len.saturating_sub(1),
        }
    }
}

/// Which cases count toward the denominator of an exclusiveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusiveDenominator {
    /// Cases containing at least one of the two activities.
    #[default]
    EitherPresent,
    /// Every case in the log.
    AllCases,
}

/// Options controlling rule evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    pub terminal_index: TerminalIndex,
    pub exclusive_denominator: ExclusiveDenominator,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terminal_index(mut self, terminal_index: TerminalIndex) -> Self {
        self.terminal_index = terminal_index;
        self
    }

    pub fn with_exclusive_denominator(mut self, denominator: ExclusiveDenominator) -> Self {
        self.exclusive_denominator = denominator;
        self
    }
}

/// Priority order used by hierarchical composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyOrder {
    /// Rules tried in the given order; rank 1 is the first entry.
    Sequence(Vec<Rule>),
    /// Rules tried by descending risk score; equal scores keep their order.
    ByRisk(Vec<(Rule, f64)>),
}

impl HierarchyOrder {
    /// Rules in the order they are tried.
    pub fn ranked_rules(&self) -> Vec<Rule> {
        match self {
            HierarchyOrder::Sequence(rules) => rules.clone(),
            HierarchyOrder::ByRisk(scored) => {
                let mut scored = scored.clone();
                scored.sort_by(|left, right| right.1.total_cmp(&left.1));
                scored.into_iter().map(|(rule, _)| rule).collect()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            HierarchyOrder::Sequence(rules) => rules.is_empty(),
            HierarchyOrder::ByRisk(scored) => scored.is_empty(),
        }
    }
}

/// How several rule outcomes fold into one label per case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositePolicy {
    /// `y = 1` if any rule is violated; `y_pos` is the earliest position.
    #[default]
    Flat,
    /// `y` is the 1-based rank of the first violated rule in priority order.
    Hierarchical(HierarchyOrder),
}

/// How `max_trace_length` is compared against the reduced cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxLengthPolicy {
    /// Keep cases with `cutoff <= max_trace_length + prefix_reduction`.
    #[default]
    Offset,
    /// Keep cases with `cutoff <= max_trace_length`.
    Strict,
}

/// Options for turning composite outcomes into a truncated prefix dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Subtracted from `y_pos` to obtain the cutoff.
    pub prefix_reduction: usize,
    /// Cases whose cutoff falls below this are dropped.
    pub min_trace_length: usize,
    /// Cases whose cutoff exceeds this (per `max_length_policy`) are dropped.
    pub max_trace_length: Option<usize>,
    pub max_length_policy: MaxLengthPolicy,
    /// Attach the composite `y_pos` next to `y`.
    pub keep_y_pos: bool,
    /// Remove per-rule flag/position columns and the event index and cutoff
    /// helpers from the result.
    pub drop_helper_columns: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            prefix_reduction: 1,
            min_trace_length: 2,
            max_trace_length: None,
            max_length_policy: MaxLengthPolicy::default(),
            keep_y_pos: false,
            drop_helper_columns: true,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix_reduction(mut self, prefix_reduction: usize) -> Self {
        self.prefix_reduction = prefix_reduction;
        self
    }

    pub fn with_min_trace_length(mut self, min_trace_length: usize) -> Self {
        self.min_trace_length = min_trace_length;
        self
    }

    pub fn with_max_trace_length(mut self, max_trace_length: Option<usize>) -> Self {
        self.max_trace_length = max_trace_length;
        self
    }

    pub fn with_max_length_policy(mut self, policy: MaxLengthPolicy) -> Self {
        self.max_length_policy = policy;
        self
    }

    pub fn with_keep_y_pos(mut self, keep: bool) -> Self {
        self.keep_y_pos = keep;
        self
    }

    pub fn with_drop_helper_columns(mut self, drop: bool) -> Self {
        self.drop_helper_columns = drop;
        self
    }

    /// Upper bound on the cutoff, if any.
    pub fn max_cutoff(&self) -> Option<i64> {
        self.max_trace_length.map(|max| match self.max_length_policy {
            MaxLengthPolicy::Offset => (max + self.prefix_reduction) as i64,
            MaxLengthPolicy::Strict => max as i64,
        })
    }
}
