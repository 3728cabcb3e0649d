use conform_model::{Case, TerminalIndex, Verdict};

/// Every `response` answers one earlier open `request`. Any request left
/// open when the trace ends violates the rule.
pub(super) fn scan(case: &Case, request: &str, response: &str, terminal: TerminalIndex) -> Verdict {
    if !case.contains(request) {
        return Verdict::Ineligible;
    }
    let mut open_requests = 0usize;
    for name in case.activities() {
        if name == request {
            open_requests += 1;
        } else if name == response && open_requests > 0 {
            open_requests -= 1;
        }
    }
    if open_requests > 0 {
        Verdict::Violated {
            index: terminal.resolve(case.len()),
        }
    } else {
        Verdict::Compliant
    }
}

/// One `response` after the last `request` satisfies the rule.
pub(super) fn scan_single(
    case: &Case,
    request: &str,
    response: &str,
    terminal: TerminalIndex,
) -> Verdict {
    let Some(last_request) = case.last_index_of(request) else {
        return Verdict::Ineligible;
    };
    match case.last_index_of(response) {
        Some(last_response) if last_response > last_request => Verdict::Compliant,
        _ => Verdict::Violated {
            index: terminal.resolve(case.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(activities: &[&str]) -> Case {
        Case::from_activities("c", activities.iter().copied())
    }

    #[test]
    fn every_request_needs_a_response() {
        let terminal = TerminalIndex::TraceLength;
        assert_eq!(
            scan(&case(&["A", "B", "A", "B"]), "A", "B", terminal),
            Verdict::Compliant
        );
        assert_eq!(
            scan(&case(&["A", "A", "B"]), "A", "B", terminal),
            Verdict::Violated { index: 3 }
        );
        assert_eq!(
            scan(&case(&["B", "A"]), "A", "B", terminal),
            Verdict::Violated { index: 2 }
        );
        assert_eq!(scan(&case(&["B"]), "A", "B", terminal), Verdict::Ineligible);
    }

    #[test]
    fn single_occurrence_checks_last_request() {
        let terminal = TerminalIndex::TraceLength;
        assert_eq!(
            scan_single(&case(&["A", "A", "B"]), "A", "B", terminal),
            Verdict::Compliant
        );
        assert_eq!(
            scan_single(&case(&["A", "B", "A"]), "A", "B", terminal),
            Verdict::Violated { index: 3 }
        );
        assert_eq!(
            scan_single(&case(&["A", "x"]), "A", "B", TerminalIndex::LastEvent),
            Verdict::Violated { index: 1 }
        );
    }
}
