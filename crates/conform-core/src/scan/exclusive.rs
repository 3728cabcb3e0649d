use conform_model::{Case, ExclusiveDenominator, Verdict};

/// Violated whenever both activities occur, at the later first occurrence.
pub(super) fn scan(case: &Case, a: &str, b: &str, denominator: ExclusiveDenominator) -> Verdict {
    match (case.first_index_of(a), case.first_index_of(b)) {
        (Some(first_a), Some(first_b)) => Verdict::Violated {
            index: first_a.max(first_b),
        },
        (None, None) if denominator == ExclusiveDenominator::EitherPresent => Verdict::Ineligible,
        _ => Verdict::Compliant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(activities: &[&str], denominator: ExclusiveDenominator) -> Verdict {
        let case = Case::from_activities("c", activities.iter().copied());
        scan(&case, "A", "B", denominator)
    }

    #[test]
    fn both_present_violates_at_later_first_occurrence() {
        let either = ExclusiveDenominator::EitherPresent;
        assert_eq!(check(&["B", "x", "A", "B"], either), Verdict::Violated { index: 2 });
        assert_eq!(check(&["A", "B", "A"], either), Verdict::Violated { index: 1 });
    }

    #[test]
    fn denominator_policy_controls_eligibility() {
        assert_eq!(check(&["A"], ExclusiveDenominator::EitherPresent), Verdict::Compliant);
        assert_eq!(check(&["x"], ExclusiveDenominator::EitherPresent), Verdict::Ineligible);
        assert_eq!(check(&["x"], ExclusiveDenominator::AllCases), Verdict::Compliant);
    }
}
