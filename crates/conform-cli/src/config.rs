//! TOML run configuration.
//!
//! ```toml
//! [schema]
//! case_id = "case:concept:name"
//! activity = "concept:name"
//!
//! [checks]
//! terminal_index = "trace_length"
//!
//! [[rules]]
//! kind = "precedence"
//! preceding = "register"
//! request = "approve"
//! risk = 0.8
//!
//! [composition]
//! policy = "hierarchical"
//! priority = "risk"
//!
//! [encoding]
//! prefix_reduction = 1
//! min_trace_length = 2
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use conform_core::LabelingPipeline;
use conform_ingest::EventLogSchema;
use conform_model::{CheckOptions, CompositePolicy, EncodeOptions, HierarchyOrder, Rule};

/// Complete configuration of one labeling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub schema: EventLogSchema,
    pub checks: CheckOptions,
    pub rules: Vec<RuleEntry>,
    pub composition: CompositionConfig,
    pub encoding: EncodingConfig,
}

/// A rule together with its optional risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(flatten)]
    pub rule: Rule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Flat,
    Hierarchical,
}

/// Where the hierarchical priority comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityKind {
    /// Order of the `[[rules]]` entries.
    #[default]
    Sequence,
    /// Descending `risk` of each entry.
    Risk,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    pub policy: PolicyKind,
    pub priority: PriorityKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Produce the prefix dataset; labeling alone when false.
    pub enabled: bool,
    #[serde(flatten)]
    pub options: EncodeOptions,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            options: EncodeOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config)
    }

    pub fn rules(&self) -> Vec<Rule> {
        self.rules.iter().map(|entry| entry.rule.clone()).collect()
    }

    /// Composition policy described by `[composition]`.
    pub fn composite_policy(&self) -> Result<CompositePolicy> {
        let policy = match (self.composition.policy, self.composition.priority) {
            (PolicyKind::Flat, _) => CompositePolicy::Flat,
            (PolicyKind::Hierarchical, PriorityKind::Sequence) => {
                CompositePolicy::Hierarchical(HierarchyOrder::Sequence(self.rules()))
            }
            (PolicyKind::Hierarchical, PriorityKind::Risk) => {
                let mut scored = Vec::with_capacity(self.rules.len());
                for entry in &self.rules {
                    let Some(risk) = entry.risk else {
                        bail!("risk priority requires a risk score on {}", entry.rule);
                    };
                    scored.push((entry.rule.clone(), risk));
                }
                CompositePolicy::Hierarchical(HierarchyOrder::ByRisk(scored))
            }
        };
        Ok(policy)
    }

    /// Validate the configuration and build a pipeline from it.
    pub fn build_pipeline(&self) -> Result<LabelingPipeline> {
        let policy = self.composite_policy()?;
        let encode = self.encoding.enabled.then_some(self.encoding.options);
        let pipeline = LabelingPipeline::new(self.schema.clone(), self.rules(), policy)
            .context("invalid rule configuration")?
            .with_check_options(self.checks)
            .with_encode_options(encode);
        Ok(pipeline)
    }
}
