//! Terminal rendering of command reports.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use vimaan_map::SuggestionResult;
use vimaan_preprocess::PreprocessSummary;
use vimaan_view::Window;

use crate::commands::{DerivedKind, DerivedReport, InspectReport, PreviewReport};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn inspect_table(report: &InspectReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Column"), header_cell("Role")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (position, column) in report.columns.iter().enumerate() {
        let role = match column.role {
            Some(role) => Cell::new(role.label()).fg(Color::Green),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(position + 1), Cell::new(&column.name), role]);
    }
    table
}

pub fn suggestion_table(result: &SuggestionResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("Column"),
        header_cell("Confidence"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for suggestion in &result.suggestions {
        table.add_row(vec![
            Cell::new(suggestion.role.label()),
            Cell::new(&suggestion.column),
            Cell::new(format!("{:.2}", suggestion.confidence)),
        ]);
    }
    for role in &result.unmatched_roles {
        table.add_row(vec![Cell::new(role.label()), dim_cell("-"), dim_cell("-")]);
    }
    table
}

/// Rows of a window with their labels in the first column.
pub fn window_table(window: &Window) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Row")];
    header.extend(window.column_headers.iter().map(|name| header_cell(name)));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (label, cells) in window.row_headers.iter().zip(&window.cells) {
        let mut row = vec![Cell::new(label).fg(Color::Blue)];
        row.extend(cells.iter().map(|value| {
            if value.is_empty() {
                dim_cell("")
            } else {
                Cell::new(value)
            }
        }));
        table.add_row(row);
    }
    table
}

pub fn summary_line(summary: &PreprocessSummary) -> String {
    format!(
        "{} rows, {} with missing fields, {} duplicates in {} groups",
        summary.total_rows, summary.missing_rows, summary.duplicate_rows, summary.duplicate_groups
    )
}

pub fn print_inspect(report: &InspectReport) {
    println!("File: {}", report.path.display());
    println!("Rows: {}", report.rows);
    println!("{}", inspect_table(report));
    let assigned = format!(
        "{} of {} roles",
        report.mapping.assigned, report.mapping.required
    );
    if report.complete {
        println!("Mapping: complete ({assigned})");
    } else {
        let roles: Vec<&str> = report.unassigned.iter().map(|role| role.key()).collect();
        println!(
            "Mapping: incomplete, {assigned} (unassigned: {})",
            roles.join(", ")
        );
    }
}

pub fn print_preview(report: &PreviewReport) {
    println!("{}", window_table(&report.window));
    println!(
        "Page {} of {} ({} rows)",
        report.page,
        report.page_count.max(1),
        report.window.total_rows
    );
}

pub fn print_derived(report: &DerivedReport) {
    let title = match report.view {
        DerivedKind::Missing => "Rows with missing fields",
        DerivedKind::Duplicates => "Duplicate rows",
    };
    println!("{title}: {}", report.rows.len());
    if !report.rows.is_empty() {
        let window = Window {
            first_row: 0,
            total_rows: report.rows.len(),
            column_headers: report.columns.clone(),
            row_headers: report.rows.iter().map(|row| row.row.to_string()).collect(),
            cells: report.rows.iter().map(|row| row.cells.clone()).collect(),
        };
        println!("{}", window_table(&window));
    }
    println!("{}", summary_line(&report.summary));
}
