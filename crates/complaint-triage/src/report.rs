//! Plain-text rendering of dashboard views for the terminal.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, Table};
use unicode_width::UnicodeWidthStr;

use triage_core::error::SourceFailure;
use triage_core::formatting::{display_goal, format_count, format_percent, truncate_text};
use triage_core::models::{
    CategorizedRecord, CategoryAggregate, ChartSeries, GoalCount, GoalMapping, SummaryStats,
};

/// Widest bar drawn by [`render_chart`].
const BAR_WIDTH: usize = 40;

/// Complaint text is cut to this many characters in record listings.
const TEXT_PREVIEW_CHARS: usize = 60;

// ── Table helpers ──────────────────────────────────────────────────────────────

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_header(header.to_vec());
    table
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

// ── Views ──────────────────────────────────────────────────────────────────────

pub fn render_summary(stats: &SummaryStats) -> String {
    let mut table = new_table(&["Category", "Count", "Share"]);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for share in &stats.categories {
        table.add_row(vec![
            share.category.clone(),
            format_count(share.count),
            format_percent(share.percentage),
        ]);
    }
    format!(
        "Total complaints: {}\nDistinct categories: {}\n\n{table}\n",
        format_count(stats.total_records),
        stats.distinct_categories
    )
}

/// Horizontal bar chart scaled to the largest category.
pub fn render_chart(series: &ChartSeries) -> String {
    if series.is_empty() {
        return String::new();
    }
    let label_width = series.categories.iter().map(|c| c.width()).max().unwrap_or(0);
    let max = series.counts.iter().copied().max().unwrap_or(0);

    let mut out = String::new();
    for (category, count) in series.categories.iter().zip(&series.counts) {
        let bar_len = if max == 0 {
            0
        } else {
            // Non-zero counts always get at least one cell.
            ((count * BAR_WIDTH) / max).max(1)
        };
        let pad = " ".repeat(label_width.saturating_sub(category.width()));
        out.push_str(&format!(
            "{category}{pad}  {} {}\n",
            "█".repeat(bar_len),
            format_count(*count)
        ));
    }
    out
}

pub fn render_ranking(ranking: &[CategoryAggregate]) -> String {
    let mut table = new_table(&["Rank", "Category", "Count", "Business goal"]);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in ranking {
        table.add_row(vec![
            row.priority_rank.to_string(),
            row.category.clone(),
            format_count(row.count),
            display_goal(&row.business_goal).to_string(),
        ]);
    }
    format!("{table}\n")
}

pub fn render_goals(mapping: &[GoalMapping], goal_counts: &[GoalCount]) -> String {
    let mut by_category = new_table(&["Category", "Business goal", "Count"]);
    align_column(&mut by_category, 2, CellAlignment::Right);
    for row in mapping {
        by_category.add_row(vec![
            row.category.clone(),
            display_goal(&row.business_goal).to_string(),
            format_count(row.count),
        ]);
    }

    let mut by_goal = new_table(&["Business goal", "Count"]);
    align_column(&mut by_goal, 1, CellAlignment::Right);
    for row in goal_counts {
        by_goal.add_row(vec![
            display_goal(&row.business_goal).to_string(),
            format_count(row.count),
        ]);
    }

    format!("{by_category}\n\n{by_goal}\n")
}

/// Record listing for the category and goal filters.
pub fn render_records(title: &str, records: &[&CategorizedRecord]) -> String {
    let mut table = new_table(&["Source", "Row", "Category", "Complaint"]);
    align_column(&mut table, 1, CellAlignment::Right);
    for record in records {
        table.add_row(vec![
            record.record.source.clone(),
            record.record.source_row_index.to_string(),
            record.category.clone(),
            truncate_text(&record.record.raw_text, TEXT_PREVIEW_CHARS),
        ]);
    }
    format!("{title} ({} complaints)\n\n{table}\n", format_count(records.len()))
}

/// Warning block listing sources skipped by a partial load.
pub fn render_failures(failures: &[SourceFailure]) -> String {
    let mut out = format!("Skipped {} source(s):\n", failures.len());
    for failure in failures {
        out.push_str(&format!("  {}: {}\n", failure.source_name, failure.error));
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
