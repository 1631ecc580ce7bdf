use crate::filter::{Clause, LabelSet, Operator};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::json;
use std::fmt::Write as _;

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    // Follow the same switch as `colored` so --color applies to tables too.
    if colored::control::SHOULD_COLORIZE.should_colorize() {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
    table
}

fn operator_cell(operator: Operator) -> Cell {
    let color = match operator {
        Operator::Equal => Color::Green,
        Operator::NotEqual => Color::Red,
        Operator::LessThan | Operator::GreaterThan => Color::Yellow,
        Operator::RegexMatch => Color::Cyan,
        Operator::RegexNoMatch => Color::Magenta,
    };
    Cell::new(operator.as_str())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

/// Format decoded clauses as a table, or a note when there are none.
pub fn format_clauses_text(clauses: &[Clause]) -> String {
    if clauses.is_empty() {
        return format!("{}\n", "No clauses found.".dimmed());
    }

    let mut table = create_styled_table(&["#", "Key", "Operator", "Value"]);
    for (idx, clause) in clauses.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx),
            Cell::new(&clause.key),
            operator_cell(clause.operator),
            Cell::new(&clause.value),
        ]);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{table}");
    let _ = writeln!(
        out,
        "{} clause{}",
        clauses.len().to_string().bold(),
        if clauses.len() == 1 { "" } else { "s" }
    );
    out
}

pub fn format_clauses_json(clauses: &[Clause]) -> String {
    serde_json::to_string_pretty(clauses).unwrap_or_else(|_| "[]".into())
}

pub fn format_query_text(query: &str) -> String {
    format!("{query}\n")
}

pub fn format_query_json(query: &str, clauses: &[Clause]) -> String {
    serde_json::to_string_pretty(&json!({
        "query": query,
        "clauses": clauses,
    }))
    .unwrap_or_else(|_| "{\"error\":\"failed to serialize query\"}".into())
}

/// One JSON object per line for the matching label sets, then a summary line.
pub fn format_matches_text(matched: &[LabelSet], total: usize) -> String {
    let mut out = String::new();
    for labels in matched {
        let _ = writeln!(
            out,
            "{}",
            serde_json::to_string(labels).unwrap_or_default()
        );
    }
    let _ = writeln!(
        out,
        "{} of {} label sets matched",
        matched.len().to_string().green().bold(),
        total
    );
    out
}

pub fn format_matches_json(matched: &[LabelSet], total: usize) -> String {
    serde_json::to_string_pretty(&json!({
        "total": total,
        "matched": matched.len(),
        "label_sets": matched,
    }))
    .unwrap_or_else(|_| "{\"error\":\"failed to serialize matches\"}".into())
}

pub fn format_series_text(
    profile: &str,
    tag_key_series: &[&str],
    health_series: &[String],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", "SERVICE GRAPH SERIES".bold(), profile);
    let _ = writeln!(out, "\n{}", "Tag keys from:".bold());
    for series in tag_key_series {
        let _ = writeln!(out, "  {series}");
    }
    let _ = writeln!(out, "\n{}", "Health check:".bold());
    for series in health_series {
        let _ = writeln!(out, "  {series}");
    }
    out
}

pub fn format_series_json(
    profile: &str,
    tag_key_series: &[&str],
    health_series: &[String],
) -> String {
    serde_json::to_string_pretty(&json!({
        "profile": profile,
        "tag_key_series": tag_key_series,
        "health_series": health_series,
    }))
    .unwrap_or_else(|_| "{\"error\":\"failed to serialize series\"}".into())
}
