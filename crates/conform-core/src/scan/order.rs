use conform_model::{Case, Verdict};

use super::ScanState;

/// Eligible when both activities occur. A `second` seen before any `first`
/// is a violation; `first` occurrences are counted, never consumed.
pub(super) fn scan(case: &Case, first: &str, second: &str) -> Verdict {
    if !(case.contains(first) && case.contains(second)) {
        return Verdict::Ineligible;
    }
    let mut state = ScanState::Seeking;
    let mut firsts_seen = 0usize;
    for (idx, name) in case.activities().enumerate() {
        if name == first {
            firsts_seen += 1;
        } else if name == second && firsts_seen == 0 {
            state.latch(idx);
            break;
        }
    }
    state.verdict()
}
