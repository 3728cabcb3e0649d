//! Folds several labeled rules into one composite outcome per case.

use std::collections::BTreeMap;
use std::time::Instant;

use conform_ingest::{CaseView, any_to_i64};
use conform_model::{CompositeOutcome, CompositePolicy, Rule};
use polars::prelude::{AnyValue, DataFrame};
use tracing::{debug, info, info_span};

use crate::error::{CheckError, Result};
use crate::label::LabeledLog;

/// Composite outcomes keyed by case id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    pub by_case: BTreeMap<String, CompositeOutcome>,
    /// Rules that took part, in the order they were consulted.
    pub rules: Vec<Rule>,
}

impl Composition {
    pub fn get(&self, case_id: &str) -> Option<CompositeOutcome> {
        self.by_case.get(case_id).copied()
    }

    /// Number of cases with a non-zero label.
    pub fn positive_cases(&self) -> usize {
        self.by_case.values().filter(|outcome| outcome.y > 0).count()
    }
}

/// Check a policy against the available rules without touching any row.
///
/// # Errors
///
/// Fails on an empty rule list, an empty hierarchical order, or a
/// hierarchical entry that is not among `rules`.
pub fn validate_policy(rules: &[Rule], policy: &CompositePolicy) -> Result<()> {
    if rules.is_empty() {
        return Err(CheckError::EmptyRuleList);
    }
    if let CompositePolicy::Hierarchical(order) = policy {
        if order.is_empty() {
            return Err(CheckError::MissingPriorityOrder);
        }
        if let Some(rule) = order
            .ranked_rules()
            .into_iter()
            .find(|rule| !rules.contains(rule))
        {
            return Err(CheckError::UnlabeledRule {
                rule: rule.to_string(),
            });
        }
    }
    Ok(())
}

/// Compose every rule labeled onto `labeled` under `policy`.
pub fn compose(
    labeled: &LabeledLog,
    view: &CaseView,
    policy: &CompositePolicy,
) -> Result<Composition> {
    compose_rules(labeled, view, labeled.labels(), policy)
}

/// Encode straight from one rule's pair: `y` is its flag, `y_pos` its position.
pub fn compose_single(labeled: &LabeledLog, view: &CaseView, rule: &Rule) -> Result<Composition> {
    compose_rules(
        labeled,
        view,
        std::slice::from_ref(rule),
        &CompositePolicy::Flat,
    )
}

/// Compose the given subset of labeled rules under `policy`.
///
/// Flat composition uses `rules` as given. Hierarchical composition consults
/// its own priority order, every entry of which must be among `rules`.
pub fn compose_rules(
    labeled: &LabeledLog,
    view: &CaseView,
    rules: &[Rule],
    policy: &CompositePolicy,
) -> Result<Composition> {
    let span = info_span!("compose", rules = rules.len());
    let _guard = span.enter();
    let start = Instant::now();

    validate_policy(rules, policy)?;
    let consulted = match policy {
        CompositePolicy::Flat => rules.to_vec(),
        CompositePolicy::Hierarchical(order) => order.ranked_rules(),
    };
    if let Some(rule) = consulted.iter().find(|rule| !labeled.is_labeled(rule)) {
        return Err(CheckError::UnlabeledRule {
            rule: rule.to_string(),
        });
    }

    let mut by_case = BTreeMap::new();
    for (case_idx, case) in view.cases().iter().enumerate() {
        let Some(&row) = view.rows_of(case_idx).first() else {
            continue;
        };
        let pairs = consulted
            .iter()
            .map(|rule| read_pair(labeled, rule, row))
            .collect::<Result<Vec<(bool, usize)>>>()?;
        let outcome = match policy {
            CompositePolicy::Flat => flat(&pairs, case.len()),
            CompositePolicy::Hierarchical(_) => hierarchical(&pairs, case.len()),
        };
        debug!(case_id = %case.id, y = outcome.y, y_pos = outcome.y_pos, "composed");
        by_case.insert(case.id.clone(), outcome);
    }

    let composition = Composition {
        by_case,
        rules: consulted,
    };
    info!(
        cases = composition.by_case.len(),
        positive = composition.positive_cases(),
        duration_ms = start.elapsed().as_millis(),
        "outcomes composed"
    );
    Ok(composition)
}

fn flat(pairs: &[(bool, usize)], case_len: usize) -> CompositeOutcome {
    let violated = pairs.iter().any(|(flag, _)| *flag);
    let y_pos = pairs
        .iter()
        .map(|(_, position)| *position)
        .min()
        .unwrap_or(case_len);
    CompositeOutcome {
        y: u32::from(violated),
        y_pos,
    }
}

fn hierarchical(pairs: &[(bool, usize)], case_len: usize) -> CompositeOutcome {
    for (rank, (flag, position)) in pairs.iter().enumerate() {
        if *flag {
            return CompositeOutcome {
                y: rank as u32 + 1,
                y_pos: *position,
            };
        }
    }
    let y_pos = pairs
        .iter()
        .map(|(_, position)| *position)
        .max()
        .unwrap_or(case_len);
    CompositeOutcome { y: 0, y_pos }
}

fn read_pair(labeled: &LabeledLog, rule: &Rule, row: usize) -> Result<(bool, usize)> {
    let columns = labeled
        .columns_of(rule)
        .ok_or_else(|| CheckError::UnlabeledRule {
            rule: rule.to_string(),
        })?;
    let flag = read_count(labeled.data(), &columns.flag, row)?;
    let position = read_count(labeled.data(), &columns.position, row)?;
    Ok((flag != 0, position))
}

fn read_count(df: &DataFrame, column: &str, row: usize) -> Result<usize> {
    let value = df.column(column)?.get(row).unwrap_or(AnyValue::Null);
    any_to_i64(value)
        .and_then(|value| usize::try_from(value).ok())
        .ok_or_else(|| CheckError::DataFrame {
            message: format!("column '{column}' holds a non-count value in row {row}"),
        })
}
