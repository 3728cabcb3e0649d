//! Per-rule sequence scanners.
//!
//! Every scanner is a pure function of one case and one rule's parameters.
//! Each makes a single pass over the case (two short reverse lookups at most
//! for the single-occurrence variants) and reports only the first detectable
//! violation.

mod cardinality;
mod exclusive;
mod order;
mod precedence;
mod response;
mod time_elapse;

use conform_model::{Case, CheckOptions, Rule, Verdict};

use crate::error::Result;

/// First-violation latch shared by the forward scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Seeking,
    Violated(usize),
}

impl ScanState {
    /// Record a violation at `index` unless one is already latched.
    pub fn latch(&mut self, index: usize) {
        if *self == ScanState::Seeking {
            *self = ScanState::Violated(index);
        }
    }

    pub fn is_latched(self) -> bool {
        matches!(self, ScanState::Violated(_))
    }

    /// Verdict for an eligible case.
    pub fn verdict(self) -> Verdict {
        match self {
            ScanState::Seeking => Verdict::Compliant,
            ScanState::Violated(index) => Verdict::Violated { index },
        }
    }
}

/// Scan one case against one rule.
///
/// # Errors
///
/// Only timestamp-based rules can fail, when an eligible case has an event
/// without a timestamp.
pub fn scan_case(rule: &Rule, case: &Case, options: &CheckOptions) -> Result<Verdict> {
    let verdict = match rule {
        Rule::Cardinality {
            activity,
            lower,
            upper,
        } => cardinality::scan(case, activity, *lower, *upper, options.terminal_index),
        Rule::Order { first, second } => order::scan(case, first, second),
        Rule::Response {
            request,
            response,
            single_occurrence,
        } => {
            if *single_occurrence {
                response::scan_single(case, request, response, options.terminal_index)
            } else {
                response::scan(case, request, response, options.terminal_index)
            }
        }
        Rule::Precedence {
            preceding,
            request,
            single_occurrence,
        } => {
            if *single_occurrence {
                precedence::scan_single(case, preceding, request)
            } else {
                precedence::scan(case, preceding, request)
            }
        }
        Rule::Exclusive { a, b } => exclusive::scan(case, a, b, options.exclusive_denominator),
        Rule::TimeElapse { end_activity } => return time_elapse::scan(case, end_activity),
    };
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_keeps_first_index() {
        let mut state = ScanState::default();
        assert_eq!(state.verdict(), Verdict::Compliant);
        state.latch(3);
        state.latch(1);
        assert!(state.is_latched());
        assert_eq!(state.verdict(), Verdict::Violated { index: 3 });
    }
}
