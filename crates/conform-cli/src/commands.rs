use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use conform_cli::config::PipelineConfig;
use conform_core::LabelingPipeline;
use conform_ingest::{read_event_log, write_frame_csv};
use conform_model::{MaxLengthPolicy, RuleKind, RuleOutcome};

use crate::cli::{ColumnArgs, EncodingArgs, LabelArgs};
use crate::summary::apply_table_style;
use crate::types::{LabelResult, RuleReport};

pub fn run_rules() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Kind", "Description", "Timestamps"]);
    apply_table_style(&mut table);
    for kind in RuleKind::ALL {
        let timestamps = if kind.requires_timestamps() { "yes" } else { "-" };
        table.add_row(vec![kind.as_str(), kind.description(), timestamps]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_label(args: &LabelArgs) -> Result<LabelResult> {
    let span = info_span!("label_log", log = %args.log.display());
    let _guard = span.enter();

    let mut config = PipelineConfig::load(&args.config)?;
    apply_column_overrides(&mut config, &args.columns);
    apply_encoding_overrides(&mut config, &args.encoding);
    let pipeline = config.build_pipeline()?;

    let df = read_event_log(&args.log).with_context(|| format!("read {}", args.log.display()))?;
    if args.summary_only {
        return summarize_log(args, &pipeline, &df);
    }
    let output = pipeline.run(df).context("label event log")?;
    let (rules, errors) = rule_reports(&output.outcomes);

    let mut outputs = Vec::new();
    if args.dry_run {
        info!("dry run, no files written");
    } else {
        if let Some(path) = &args.labeled_output {
            let mut labeled = output.labeled.data().clone();
            write_frame_csv(&mut labeled, path)
                .with_context(|| format!("write {}", path.display()))?;
            outputs.push(path.clone());
        }
        if let Some(path) = &args.output {
            match &output.encoded {
                Some(encoded) => {
                    let mut encoded = encoded.clone();
                    write_frame_csv(&mut encoded, path)
                        .with_context(|| format!("write {}", path.display()))?;
                    outputs.push(path.clone());
                }
                None => warn!(path = %path.display(), "encoding disabled, output not written"),
            }
        }
        if let Some(path) = &args.summary_json {
            write_summary_json(&output.outcomes, path)?;
            outputs.push(path.clone());
        }
    }

    let has_errors = !errors.is_empty();
    Ok(LabelResult {
        log_path: args.log.clone(),
        cases: output.composition.by_case.len(),
        events: output.labeled.data().height(),
        rules,
        positive_cases: Some(output.composition.positive_cases()),
        encoded_rows: output.encoded.as_ref().map(DataFrame::height),
        outputs,
        errors,
        has_errors,
    })
}

/// Evaluate the rules without labeling, composing or encoding the log.
fn summarize_log(
    args: &LabelArgs,
    pipeline: &LabelingPipeline,
    df: &DataFrame,
) -> Result<LabelResult> {
    let view = pipeline.case_view(df).context("group event log")?;
    let outcomes = pipeline.evaluate(&view).context("evaluate rules")?;
    let (rules, errors) = rule_reports(&outcomes);

    let mut outputs = Vec::new();
    if let Some(path) = &args.summary_json {
        if args.dry_run {
            info!("dry run, no files written");
        } else {
            write_summary_json(&outcomes, path)?;
            outputs.push(path.clone());
        }
    }

    let has_errors = !errors.is_empty();
    Ok(LabelResult {
        log_path: args.log.clone(),
        cases: view.len(),
        events: view.event_count(),
        rules,
        positive_cases: None,
        encoded_rows: None,
        outputs,
        errors,
        has_errors,
    })
}

/// Attach violation percentages; rules without eligible cases report an error.
fn rule_reports(outcomes: &[RuleOutcome]) -> (Vec<RuleReport>, Vec<String>) {
    let mut errors = Vec::new();
    let rules = outcomes
        .iter()
        .map(|outcome| {
            info!("{}", outcome.summary());
            let percentage = match outcome.violation_percentage() {
                Ok(value) => Some(value),
                Err(error) => {
                    errors.push(error.to_string());
                    None
                }
            };
            RuleReport {
                outcome: outcome.clone(),
                percentage,
            }
        })
        .collect();
    (rules, errors)
}

fn apply_column_overrides(config: &mut PipelineConfig, columns: &ColumnArgs) {
    if let Some(name) = &columns.case_column {
        config.schema.case_id.clone_from(name);
    }
    if let Some(name) = &columns.activity_column {
        config.schema.activity.clone_from(name);
    }
    if let Some(name) = &columns.timestamp_column {
        config.schema.timestamp = Some(name.clone());
    }
}

fn apply_encoding_overrides(config: &mut PipelineConfig, encoding: &EncodingArgs) {
    if encoding.no_encode {
        config.encoding.enabled = false;
    }
    let options = &mut config.encoding.options;
    if let Some(value) = encoding.prefix_reduction {
        options.prefix_reduction = value;
    }
    if let Some(value) = encoding.min_trace_length {
        options.min_trace_length = value;
    }
    if encoding.max_trace_length.is_some() {
        options.max_trace_length = encoding.max_trace_length;
    }
    if encoding.strict_max_length {
        options.max_length_policy = MaxLengthPolicy::Strict;
    }
    if encoding.keep_y_pos {
        options.keep_y_pos = true;
    }
    if encoding.keep_helper_columns {
        options.drop_helper_columns = false;
    }
}

fn write_summary_json(outcomes: &[RuleOutcome], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(outcomes).context("serialize outcomes")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
