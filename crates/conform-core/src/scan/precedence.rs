use conform_model::{Case, Verdict};

use super::ScanState;

/// Every `request` consumes one earlier unmatched `preceding`.
pub(super) fn scan(case: &Case, preceding: &str, request: &str) -> Verdict {
    if !case.contains(request) {
        return Verdict::Ineligible;
    }
    let mut state = ScanState::Seeking;
    let mut unmatched = 0usize;
    for (idx, name) in case.activities().enumerate() {
        if name == preceding {
            unmatched += 1;
        } else if name == request {
            if unmatched == 0 {
                state.latch(idx);
                break;
            }
            unmatched -= 1;
        }
    }
    state.verdict()
}

/// One `preceding` before the first `request` satisfies the rule.
pub(super) fn scan_single(case: &Case, preceding: &str, request: &str) -> Verdict {
    let Some(first_request) = case.first_index_of(request) else {
        return Verdict::Ineligible;
    };
    match case.first_index_of(preceding) {
        Some(first_preceding) if first_preceding < first_request => Verdict::Compliant,
        _ => Verdict::Violated {
            index: first_request,
        },
    }
}
