use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{LabelResult, RuleReport};

pub fn print_summary(result: &LabelResult) {
    println!("Log: {}", result.log_path.display());
    println!("Cases: {}  Events: {}", result.cases, result.events);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Kind"),
        header_cell("Eligible"),
        header_cell("Violations"),
        header_cell("Violation %"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for report in &result.rules {
        table.add_row(vec![
            Cell::new(&report.outcome.rule),
            dim_cell(report.outcome.rule.kind()),
            Cell::new(report.outcome.cases_evaluated),
            count_cell(report.outcome.violations),
            percentage_cell(report),
        ]);
    }
    println!("{table}");
    if let Some(cases) = result.positive_cases {
        println!("Positive cases: {cases}");
    }
    if let Some(rows) = result.encoded_rows {
        println!("Encoded rows: {rows}");
    }
    for path in &result.outputs {
        println!("Wrote: {}", path.display());
    }
    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn percentage_cell(report: &RuleReport) -> Cell {
    match report.percentage {
        Some(value) if value > 0.0 => Cell::new(format!("{value:.2}"))
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
        Some(value) => dim_cell(format!("{value:.2}")),
        None => Cell::new("no eligible cases").fg(Color::Red),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
