//! End-to-end labeling pipeline with explicit stages.
//!
//! The stages run in order:
//! 1. **Case view**: resolve the schema and group rows by case
//! 2. **Evaluate**: scan every case against every rule
//! 3. **Label**: append one flag/position pair per rule
//! 4. **Compose**: fold the pairs into one outcome per case
//! 5. **Encode**: truncate cases to their prefixes (optional)

use std::time::Instant;

use conform_ingest::{CaseView, EventLogSchema};
use conform_model::{CheckOptions, CompositePolicy, EncodeOptions, Rule, RuleOutcome};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use crate::aggregate::evaluate_rules;
use crate::compose::{Composition, compose, validate_policy};
use crate::encode::{check_reserved_columns, encode_prefixes};
use crate::error::Result;
use crate::label::LabeledLog;

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// One outcome per configured rule, in configuration order.
    pub outcomes: Vec<RuleOutcome>,
    pub labeled: LabeledLog,
    pub composition: Composition,
    /// Prefix dataset, when encoding is enabled.
    pub encoded: Option<DataFrame>,
}

/// A validated rule configuration ready to run over event logs.
#[derive(Debug, Clone)]
pub struct LabelingPipeline {
    schema: EventLogSchema,
    rules: Vec<Rule>,
    policy: CompositePolicy,
    check_options: CheckOptions,
    encode_options: Option<EncodeOptions>,
}

impl LabelingPipeline {
    /// Validate the rules and composition policy up front.
    ///
    /// # Errors
    ///
    /// Fails on an invalid rule, an empty rule list, or a hierarchical
    /// policy whose order is empty or names rules outside `rules`.
    pub fn new(schema: EventLogSchema, rules: Vec<Rule>, policy: CompositePolicy) -> Result<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        validate_policy(&rules, &policy)?;
        Ok(Self {
            schema,
            rules,
            policy,
            check_options: CheckOptions::default(),
            encode_options: Some(EncodeOptions::default()),
        })
    }

    pub fn with_check_options(mut self, options: CheckOptions) -> Self {
        self.check_options = options;
        self
    }

    /// Set prefix encoding options; `None` stops after composition.
    pub fn with_encode_options(mut self, options: Option<EncodeOptions>) -> Self {
        self.encode_options = options;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn policy(&self) -> &CompositePolicy {
        &self.policy
    }

    /// Whether any configured rule reads timestamps.
    pub fn needs_timestamps(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.kind().requires_timestamps())
    }

    /// Resolve the schema once and group the log into cases.
    pub fn case_view(&self, df: &DataFrame) -> Result<CaseView> {
        let span = info_span!("case_view", rows = df.height());
        let _guard = span.enter();
        let start = Instant::now();

        let resolved = self.schema.resolve(df, self.needs_timestamps())?;
        let view = CaseView::from_frame(df, &resolved)?;
        info!(
            cases = view.len(),
            events = view.event_count(),
            duration_ms = start.elapsed().as_millis(),
            "case view built"
        );
        Ok(view)
    }

    /// Evaluate every rule over an already built case view.
    pub fn evaluate(&self, view: &CaseView) -> Result<Vec<RuleOutcome>> {
        evaluate_rules(view, &self.rules, &self.check_options)
    }

    /// Evaluate every rule without labeling the log.
    pub fn check(&self, df: &DataFrame) -> Result<Vec<RuleOutcome>> {
        let view = self.case_view(df)?;
        self.evaluate(&view)
    }

    /// Run every stage over `df`.
    ///
    /// When encoding is enabled, a log carrying one of the encoder's output
    /// columns is rejected before any row is read.
    pub fn run(&self, df: DataFrame) -> Result<PipelineOutput> {
        let start = Instant::now();
        if self.encode_options.is_some() {
            check_reserved_columns(&df)?;
        }
        let view = self.case_view(&df)?;
        let outcomes = self.evaluate(&view)?;

        let mut labeled = LabeledLog::new(df);
        for outcome in &outcomes {
            labeled.label(&view, outcome)?;
        }
        let composition = compose(&labeled, &view, &self.policy)?;
        let encoded = match &self.encode_options {
            Some(options) => Some(encode_prefixes(&labeled, &view, &composition, options)?),
            None => None,
        };

        info!(
            rules = self.rules.len(),
            cases = view.len(),
            duration_ms = start.elapsed().as_millis(),
            "pipeline complete"
        );
        Ok(PipelineOutput {
            outcomes,
            labeled,
            composition,
            encoded,
        })
    }
}
