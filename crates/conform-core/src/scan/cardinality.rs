use conform_model::{Case, TerminalIndex, Verdict};

use super::ScanState;

/// Every case is eligible. Exceeding `upper` latches at the offending
/// occurrence; falling short of `lower` is only known at the end.
pub(super) fn scan(
    case: &Case,
    activity: &str,
    lower: usize,
    upper: Option<usize>,
    terminal: TerminalIndex,
) -> Verdict {
    let mut state = ScanState::Seeking;
    let mut count = 0usize;
    for (idx, name) in case.activities().enumerate() {
        if name != activity {
            continue;
        }
        count += 1;
        if upper.is_some_and(|upper| count > upper) {
            state.latch(idx);
            break;
        }
    }
    if count < lower {
        state.latch(terminal.resolve(case.len()));
    }
    state.verdict()
}
