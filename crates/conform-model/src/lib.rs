pub mod error;
pub mod event;
pub mod options;
pub mod outcome;
pub mod rule;

pub use error::{ModelError, Result};
pub use event::{Case, Event};
pub use options::{
    CheckOptions, CompositePolicy, EncodeOptions, ExclusiveDenominator, HierarchyOrder,
    MaxLengthPolicy, TerminalIndex,
};
pub use outcome::{CompositeOutcome, RuleOutcome, Verdict, ViolationRecord};
pub use rule::{Rule, RuleKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_counts_only_eligible_cases() {
        let mut outcome = RuleOutcome::new(Rule::order("A", "B"));
        outcome.record("c1", Verdict::Ineligible);
        outcome.record("c2", Verdict::Compliant);
        outcome.record("c3", Verdict::Violated { index: 0 });
        assert_eq!(outcome.cases_evaluated, 2);
        assert_eq!(outcome.violations, 1);
        assert_eq!(outcome.position_for("c3", 4), 0);
        assert_eq!(outcome.position_for("c2", 4), 4);
    }

    #[test]
    fn outcome_serializes() {
        let mut outcome = RuleOutcome::new(Rule::exclusive("A", "B"));
        outcome.record("c1", Verdict::Violated { index: 2 });
        let json = serde_json::to_string(&outcome).expect("serialize outcome");
        let round: RuleOutcome = serde_json::from_str(&json).expect("deserialize outcome");
        assert_eq!(round, outcome);
    }
}
