//! Runs one rule scanner over every case of a log.

use std::time::Instant;

use conform_ingest::CaseView;
use conform_model::{CheckOptions, Rule, RuleOutcome, Verdict};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, info_span, warn};

use crate::error::Result;
use crate::scan::scan_case;

/// Evaluate `rule` over all cases and collect a fresh outcome.
///
/// Cases are scanned in parallel; verdicts are folded in case order, so the
/// outcome does not depend on scheduling.
///
/// # Errors
///
/// Fails if the rule is invalid or any eligible case cannot be scanned.
pub fn evaluate_rule(view: &CaseView, rule: &Rule, options: &CheckOptions) -> Result<RuleOutcome> {
    let span = info_span!("evaluate", rule = %rule);
    let _guard = span.enter();
    let start = Instant::now();

    rule.validate()?;
    let verdicts = view
        .cases()
        .par_iter()
        .map(|case| scan_case(rule, case, options))
        .collect::<Result<Vec<Verdict>>>()?;

    let mut outcome = RuleOutcome::new(rule.clone());
    for (case, verdict) in view.cases().iter().zip(verdicts) {
        if let Some(index) = verdict.violation_index() {
            debug!(case_id = %case.id, index, "violation");
        }
        outcome.record(&case.id, verdict);
    }

    if outcome.cases_evaluated == 0 {
        warn!(cases = view.len(), "no eligible cases");
    }
    info!(
        cases = view.len(),
        eligible = outcome.cases_evaluated,
        violations = outcome.violations,
        duration_ms = start.elapsed().as_millis(),
        "rule evaluated"
    );
    Ok(outcome)
}

/// Evaluate several rules, one outcome per rule in input order.
pub fn evaluate_rules(
    view: &CaseView,
    rules: &[Rule],
    options: &CheckOptions,
) -> Result<Vec<RuleOutcome>> {
    rules
        .iter()
        .map(|rule| evaluate_rule(view, rule, options))
        .collect()
}
