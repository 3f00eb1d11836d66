use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sirs_model::{Source, SourceCounts};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    let report = &result.report;
    if result.dry_run {
        println!("Dry run: no files written");
    }
    for path in &result.written {
        println!("Wrote: {}", path.display());
    }

    let mut sources = Table::new();
    sources.set_header(vec![
        header_cell("Source"),
        header_cell("Records"),
        header_cell("Duplicates"),
        header_cell("Timestamps"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut sources);
    for column in 1..=4 {
        align_column(&mut sources, column, CellAlignment::Right);
    }
    for counts in [&report.vitals, &report.labs] {
        sources.add_row(source_row(counts));
    }
    println!("{sources}");

    let mut cohort = Table::new();
    cohort.set_header(vec![header_cell("Cohort"), header_cell("Count")]);
    apply_summary_table_style(&mut cohort);
    align_column(&mut cohort, 1, CellAlignment::Right);
    cohort.add_row(vec![Cell::new("Timeline rows"), Cell::new(report.timeline_rows)]);
    cohort.add_row(vec![
        Cell::new("Rows meeting SIRS"),
        Cell::new(report.rows_meeting_threshold),
    ]);
    cohort.add_row(vec![Cell::new("ICU stays"), Cell::new(report.stays)]);
    cohort.add_row(vec![
        Cell::new("Stays meeting SIRS"),
        Cell::new(report.stays_meeting_threshold),
    ]);
    cohort.add_row(vec![
        Cell::new("Measurement columns"),
        Cell::new(report.measurement_columns),
    ]);
    cohort.add_row(vec![
        Cell::new("Empty aggregates"),
        count_cell(report.empty_aggregates, Color::Yellow),
    ]);
    cohort.add_row(vec![
        Cell::new("Imputed cells")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.imputed_cells).add_attribute(Attribute::Bold),
    ]);
    println!("{cohort}");
}

fn source_row(counts: &SourceCounts) -> Vec<Cell> {
    let label = counts.source.map_or("-", Source::tag);
    vec![
        Cell::new(label),
        Cell::new(counts.records),
        count_cell(counts.duplicates_collapsed, Color::Yellow),
        Cell::new(counts.wide_rows),
        Cell::new(counts.columns),
    ]
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
