//! Tests for TOML run configuration.

use std::io::Write;

use conform_cli::config::{PipelineConfig, PolicyKind, PriorityKind};
use conform_model::{
    CompositePolicy, ExclusiveDenominator, HierarchyOrder, MaxLengthPolicy, Rule, TerminalIndex,
};
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = r#"
[schema]
case_id = "case"
activity = "activity"
timestamp = "time"

[checks]
terminal_index = "last_event"
exclusive_denominator = "all_cases"

[[rules]]
kind = "precedence"
preceding = "register"
request = "approve"
risk = 0.4

[[rules]]
kind = "cardinality"
activity = "pay"
lower = 1
upper = 1
risk = 0.9

[[rules]]
kind = "response"
request = "approve"
response = "pay"
single_occurrence = true
risk = 0.1

[composition]
policy = "hierarchical"
priority = "risk"

[encoding]
prefix_reduction = 2
min_trace_length = 3
max_trace_length = 20
max_length_policy = "strict"
keep_y_pos = true
"#;

#[test]
fn parses_every_section() {
    let config = PipelineConfig::from_toml_str(FULL_CONFIG).unwrap();

    assert_eq!(config.schema.case_id, "case");
    assert_eq!(config.schema.timestamp.as_deref(), Some("time"));
    assert_eq!(config.checks.terminal_index, TerminalIndex::LastEvent);
    assert_eq!(
        config.checks.exclusive_denominator,
        ExclusiveDenominator::AllCases
    );
    assert_eq!(
        config.rules(),
        vec![
            Rule::precedence("register", "approve", false),
            Rule::cardinality("pay", 1, Some(1)),
            Rule::response("approve", "pay", true),
        ]
    );
    assert_eq!(config.rules[1].risk, Some(0.9));
    assert_eq!(config.composition.policy, PolicyKind::Hierarchical);
    assert_eq!(config.composition.priority, PriorityKind::Risk);
    assert!(config.encoding.enabled);
    assert_eq!(config.encoding.options.prefix_reduction, 2);
    assert_eq!(config.encoding.options.max_trace_length, Some(20));
    assert_eq!(
        config.encoding.options.max_length_policy,
        MaxLengthPolicy::Strict
    );
    assert!(config.encoding.options.drop_helper_columns);
}

#[test]
fn risk_priority_orders_rules_by_descending_score() {
    let config = PipelineConfig::from_toml_str(FULL_CONFIG).unwrap();
    let CompositePolicy::Hierarchical(order) = config.composite_policy().unwrap() else {
        panic!("expected hierarchical policy");
    };
    assert_eq!(
        order.ranked_rules(),
        vec![
            Rule::cardinality("pay", 1, Some(1)),
            Rule::precedence("register", "approve", false),
            Rule::response("approve", "pay", true),
        ]
    );
}

#[test]
fn defaults_apply_to_missing_sections() {
    let config = PipelineConfig::from_toml_str(
        r#"
[[rules]]
kind = "order"
first = "a"
second = "b"
"#,
    )
    .unwrap();
    assert_eq!(config.schema.case_id, "case:concept:name");
    assert_eq!(config.composite_policy().unwrap(), CompositePolicy::Flat);
    assert_eq!(config.encoding.options.prefix_reduction, 1);
    assert_eq!(config.encoding.options.min_trace_length, 2);
    assert!(config.build_pipeline().is_ok());
}

#[test]
fn sequence_priority_keeps_file_order() {
    let config = PipelineConfig::from_toml_str(
        r#"
[[rules]]
kind = "exclusive"
a = "a"
b = "b"

[[rules]]
kind = "time_elapse"
end_activity = "close"

[composition]
policy = "hierarchical"
"#,
    )
    .unwrap();
    assert_eq!(
        config.composite_policy().unwrap(),
        CompositePolicy::Hierarchical(HierarchyOrder::Sequence(vec![
            Rule::exclusive("a", "b"),
            Rule::time_elapse("close"),
        ]))
    );
    assert!(config.build_pipeline().unwrap().needs_timestamps());
}

#[test]
fn risk_priority_requires_scores() {
    let config = PipelineConfig::from_toml_str(
        r#"
[[rules]]
kind = "order"
first = "a"
second = "b"

[composition]
policy = "hierarchical"
priority = "risk"
"#,
    )
    .unwrap();
    let err = config.composite_policy().unwrap_err();
    assert!(err.to_string().contains("risk score"));
}

#[test]
fn empty_rule_list_is_rejected() {
    let config = PipelineConfig::from_toml_str("").unwrap();
    let err = config.build_pipeline().unwrap_err();
    insta::assert_snapshot!(format!("{err:#}"), @"invalid rule configuration: composition requires at least one rule");
}

#[test]
fn unknown_rule_kind_fails_to_parse() {
    let result = PipelineConfig::from_toml_str(
        r#"
[[rules]]
kind = "eventually"
activity = "a"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{FULL_CONFIG}").unwrap();
    let config = PipelineConfig::load(file.path()).unwrap();
    assert_eq!(config.rules.len(), 3);
}

#[test]
fn serialized_rule_entry_is_flat() {
    let config = PipelineConfig::from_toml_str(FULL_CONFIG).unwrap();
    let json = serde_json::to_value(&config.rules[0]).unwrap();
    insta::assert_json_snapshot!(json, @r#"
    {
      "kind": "precedence",
      "preceding": "register",
      "request": "approve",
      "risk": 0.4,
      "single_occurrence": false
    }
    "#);
}
