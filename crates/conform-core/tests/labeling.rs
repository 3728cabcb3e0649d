//! Labeling, composition and prefix encoding over a small log.

mod common;

use common::{int_column, sample_log, string_column, test_df};
use conform_core::{
    CheckError, LabelColumns, LabeledLog, compose, compose_rules, compose_single, encode_prefixes,
    evaluate_rule,
};
use conform_ingest::{CaseView, EventLogSchema};
use conform_model::{
    CheckOptions, CompositeOutcome, CompositePolicy, EncodeOptions, HierarchyOrder,
    MaxLengthPolicy, Rule,
};
use polars::prelude::DataFrame;

fn no_x() -> Rule {
    Rule::cardinality("X", 0, Some(0))
}

fn c_before_b() -> Rule {
    Rule::order("c", "b")
}

fn labeled_log(rules: &[Rule]) -> (LabeledLog, CaseView) {
    label_all(sample_log(), rules)
}

fn label_all(df: DataFrame, rules: &[Rule]) -> (LabeledLog, CaseView) {
    let schema = EventLogSchema::default().resolve(&df, false).unwrap();
    let view = CaseView::from_frame(&df, &schema).unwrap();
    let mut labeled = LabeledLog::new(df);
    for rule in rules {
        let outcome = evaluate_rule(&view, rule, &CheckOptions::default()).unwrap();
        labeled.label(&view, &outcome).unwrap();
    }
    (labeled, view)
}

fn case_rows(df: &DataFrame, case_id: &str, column: &str) -> Vec<i64> {
    let cases = string_column(df, "case:concept:name");
    int_column(df, column)
        .into_iter()
        .zip(cases)
        .filter(|(_, case)| case == case_id)
        .map(|(value, _)| value)
        .collect()
}

#[test]
fn labeling_adds_constant_flag_and_position_per_case() {
    let (labeled, _) = labeled_log(&[no_x()]);
    let df = labeled.data();
    assert_eq!(df.width(), 4);
    assert_eq!(case_rows(df, "c1", "cardinality_X_0_0"), vec![1; 7]);
    assert_eq!(case_rows(df, "c1", "Pos_cardinality_X_0_0"), vec![5; 7]);
    assert_eq!(case_rows(df, "c2", "cardinality_X_0_0"), vec![0; 2]);
    assert_eq!(case_rows(df, "c2", "Pos_cardinality_X_0_0"), vec![2; 2]);
    assert_eq!(case_rows(df, "c3", "Pos_cardinality_X_0_0"), vec![4; 4]);
}

#[test]
fn labeling_is_idempotent() {
    let (mut labeled, view) = labeled_log(&[no_x()]);
    let before = labeled.data().clone();
    let outcome = evaluate_rule(&view, &no_x(), &CheckOptions::default()).unwrap();
    labeled.label(&view, &outcome).unwrap();

    assert_eq!(labeled.labels().len(), 1);
    assert_eq!(labeled.data().width(), before.width());
    assert!(labeled.data().equals(&before));
}

#[test]
fn labeling_another_rule_appends_a_pair() {
    let (labeled, _) = labeled_log(&[no_x(), c_before_b()]);
    assert_eq!(labeled.labels(), &[no_x(), c_before_b()]);
    assert_eq!(labeled.data().width(), 6);
}

#[test]
fn flat_composition_takes_any_flag_and_minimum_position() {
    let (labeled, view) = labeled_log(&[no_x(), c_before_b()]);
    let composition = compose(&labeled, &view, &CompositePolicy::Flat).unwrap();
    assert_eq!(
        composition.get("c1"),
        Some(CompositeOutcome { y: 1, y_pos: 1 })
    );
    assert_eq!(
        composition.get("c2"),
        Some(CompositeOutcome { y: 0, y_pos: 2 })
    );
    assert_eq!(
        composition.get("c3"),
        Some(CompositeOutcome { y: 1, y_pos: 1 })
    );
    assert_eq!(composition.positive_cases(), 2);
}

#[test]
fn hierarchical_composition_uses_priority_rank() {
    let (labeled, view) = labeled_log(&[c_before_b(), no_x()]);
    let policy = CompositePolicy::Hierarchical(HierarchyOrder::Sequence(vec![
        no_x(),
        c_before_b(),
    ]));
    let composition = compose(&labeled, &view, &policy).unwrap();
    assert_eq!(
        composition.get("c1"),
        Some(CompositeOutcome { y: 1, y_pos: 5 })
    );
    assert_eq!(
        composition.get("c2"),
        Some(CompositeOutcome { y: 0, y_pos: 2 })
    );
    assert_eq!(
        composition.get("c3"),
        Some(CompositeOutcome { y: 2, y_pos: 1 })
    );
}

#[test]
fn risk_scores_order_the_hierarchy() {
    let (labeled, view) = labeled_log(&[c_before_b(), no_x()]);
    let policy = CompositePolicy::Hierarchical(HierarchyOrder::ByRisk(vec![
        (c_before_b(), 0.2),
        (no_x(), 0.9),
    ]));
    let composition = compose(&labeled, &view, &policy).unwrap();
    assert_eq!(composition.rules, vec![no_x(), c_before_b()]);
    assert_eq!(composition.get("c3").map(|outcome| outcome.y), Some(2));
}

#[test]
fn composition_errors_before_reading_rows() {
    let (labeled, view) = labeled_log(&[no_x()]);
    let err = compose_rules(&labeled, &view, &[], &CompositePolicy::Flat).unwrap_err();
    assert!(matches!(err, CheckError::EmptyRuleList));

    let empty = CompositePolicy::Hierarchical(HierarchyOrder::Sequence(Vec::new()));
    let err = compose(&labeled, &view, &empty).unwrap_err();
    assert!(matches!(err, CheckError::MissingPriorityOrder));

    let err = compose_single(&labeled, &view, &c_before_b()).unwrap_err();
    assert!(matches!(err, CheckError::UnlabeledRule { .. }));
}

#[test]
fn encoding_keeps_prefix_before_reduced_cutoff() {
    let (labeled, view) = labeled_log(&[no_x()]);
    let composition = compose_single(&labeled, &view, &no_x()).unwrap();
    let encoded =
        encode_prefixes(&labeled, &view, &composition, &EncodeOptions::default()).unwrap();

    // c1: y_pos 5 -> cutoff 4; c2: cutoff 1 < 2 dropped; c3: y_pos 4 -> cutoff 3
    assert_eq!(encoded.height(), 7);
    assert_eq!(encoded.width(), 3);
    assert_eq!(
        string_column(&encoded, "concept:name"),
        vec!["a", "b", "a", "c", "b", "d", "c"]
    );
    assert_eq!(case_rows(&encoded, "c1", "y"), vec![1; 4]);
    assert_eq!(case_rows(&encoded, "c3", "y"), vec![0; 3]);
}

#[test]
fn encoding_can_keep_helper_columns() {
    let (labeled, view) = labeled_log(&[no_x()]);
    let composition = compose_single(&labeled, &view, &no_x()).unwrap();
    let options = EncodeOptions::default()
        .with_keep_y_pos(true)
        .with_drop_helper_columns(false);
    let encoded = encode_prefixes(&labeled, &view, &composition, &options).unwrap();

    assert_eq!(encoded.width(), 8);
    assert_eq!(case_rows(&encoded, "c1", "event_index"), vec![0, 1, 2, 3]);
    assert_eq!(case_rows(&encoded, "c1", "cutoff"), vec![4; 4]);
    assert_eq!(case_rows(&encoded, "c1", "y_pos"), vec![5; 4]);
}

#[test]
fn max_trace_length_policies() {
    let (labeled, view) = labeled_log(&[no_x()]);
    let composition = compose_single(&labeled, &view, &no_x()).unwrap();

    let offset = EncodeOptions::default().with_max_trace_length(Some(3));
    let encoded = encode_prefixes(&labeled, &view, &composition, &offset).unwrap();
    assert_eq!(encoded.height(), 7);

    let strict = offset.with_max_length_policy(MaxLengthPolicy::Strict);
    let encoded = encode_prefixes(&labeled, &view, &composition, &strict).unwrap();
    assert_eq!(encoded.height(), 3);
}

#[test]
fn filtering_every_case_yields_empty_frame() {
    let (labeled, view) = labeled_log(&[no_x()]);
    let composition = compose_single(&labeled, &view, &no_x()).unwrap();
    let options = EncodeOptions::default().with_min_trace_length(10);
    let encoded = encode_prefixes(&labeled, &view, &composition, &options).unwrap();
    assert_eq!(encoded.height(), 0);
    assert_eq!(encoded.width(), 3);
}

#[test]
fn rules_with_equal_rendered_names_keep_separate_columns() {
    let df = test_df(vec![
        ("case:concept:name", vec!["c1", "c1", "c1", "c2", "c2", "c2"]),
        ("concept:name", vec!["c", "a_b", "x", "a", "b_c", "x"]),
    ]);
    let first = Rule::order("a_b", "c");
    let second = Rule::order("a", "b_c");
    let (labeled, view) = label_all(df, &[first.clone(), second.clone()]);

    assert_eq!(
        labeled.columns_of(&first),
        Some(&LabelColumns {
            flag: "order_a_b_c".to_string(),
            position: "Pos_order_a_b_c".to_string(),
        })
    );
    assert_eq!(
        labeled.columns_of(&second),
        Some(&LabelColumns {
            flag: "order_a_b_c_2".to_string(),
            position: "Pos_order_a_b_c_2".to_string(),
        })
    );
    assert_eq!(labeled.data().width(), 6);
    assert_eq!(case_rows(labeled.data(), "c1", "order_a_b_c"), vec![1; 3]);
    assert_eq!(case_rows(labeled.data(), "c1", "order_a_b_c_2"), vec![0; 3]);

    let composition = compose(&labeled, &view, &CompositePolicy::Flat).unwrap();
    assert_eq!(
        composition.get("c1"),
        Some(CompositeOutcome { y: 1, y_pos: 0 })
    );
    assert_eq!(
        composition.get("c2"),
        Some(CompositeOutcome { y: 0, y_pos: 3 })
    );

    let encoded =
        encode_prefixes(&labeled, &view, &composition, &EncodeOptions::default()).unwrap();
    assert_eq!(encoded.height(), 2);
    assert_eq!(encoded.width(), 3);
}

#[test]
fn rule_columns_never_replace_log_columns() {
    let df = test_df(vec![
        ("case:concept:name", vec!["c1", "c1", "c1"]),
        ("concept:name", vec!["b", "c", "d"]),
        ("order_c_b", vec!["keep", "these", "values"]),
    ]);
    let (labeled, _) = label_all(df, &[c_before_b()]);

    let columns = labeled.columns_of(&c_before_b()).unwrap();
    assert_eq!(columns.flag, "order_c_b_2");
    assert_eq!(
        string_column(labeled.data(), "order_c_b"),
        vec!["keep", "these", "values"]
    );
    assert_eq!(int_column(labeled.data(), "order_c_b_2"), vec![1; 3]);
}

#[test]
fn encoding_rejects_log_with_reserved_column() {
    let df = test_df(vec![
        ("case:concept:name", vec!["c1", "c1", "c1"]),
        ("concept:name", vec!["a", "b", "X"]),
        ("cutoff", vec!["user", "owned", "data"]),
    ]);
    let (labeled, view) = label_all(df, &[no_x()]);
    let composition = compose_single(&labeled, &view, &no_x()).unwrap();
    let err =
        encode_prefixes(&labeled, &view, &composition, &EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, CheckError::ReservedColumn { column } if column == "cutoff"));
}
