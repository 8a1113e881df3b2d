use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rpt_model::ReportCatalog;
use rpt_notify::SendOutcome;
use rpt_cli::{MailStatus, RunSummary, SkipReason};

pub fn print_summary(summary: &RunSummary) {
    println!("Period: {}", summary.period);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Report"),
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut total_rows = 0usize;
    let mut total_warnings = 0usize;
    for report in &summary.reports.produced {
        total_rows += report.rows;
        total_warnings += report.warnings.len();
        let file = report
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&report.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(file),
            Cell::new(report.rows),
            Cell::new(report.columns),
            count_cell(report.warnings.len(), Color::Yellow),
        ]);
    }
    for skipped in &summary.reports.skipped {
        let status = match &skipped.reason {
            SkipReason::Empty => Cell::new("skipped: no data").fg(Color::Yellow),
            SkipReason::Failed(_) => Cell::new("failed").fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(&skipped.name).fg(Color::DarkGrey),
            status,
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} written", summary.reports.produced.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    for send in &summary.individual {
        match &send.result {
            Ok(outcome) => println!("Mail ({}): {}", send.report, describe_outcome(outcome)),
            Err(error) => eprintln!("Mail ({}) failed: {error}", send.report),
        }
    }
    match &summary.mail {
        MailStatus::Disabled => println!("Mail: disabled"),
        MailStatus::Finished(outcome) => println!("Mail: {}", describe_outcome(outcome)),
    }

    let failures: Vec<_> = summary
        .reports
        .skipped
        .iter()
        .filter_map(|s| match &s.reason {
            SkipReason::Failed(message) => Some((&s.name, message)),
            SkipReason::Empty => None,
        })
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for (name, message) in failures {
            eprintln!("- {name}: {message}");
        }
    }
}

fn describe_outcome(outcome: &SendOutcome) -> String {
    match outcome {
        SendOutcome::NoRecipients => "not sent, no recipients".to_string(),
        SendOutcome::NoAttachments => "not sent, no report to attach".to_string(),
        SendOutcome::Sent {
            recipients,
            attachments,
        } => format!("sent {attachments} file(s) to {recipients} recipient(s)"),
    }
}

pub fn print_catalog(catalog: &ReportCatalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Report"),
        header_cell("Description"),
        header_cell("Sources"),
        header_cell("Joins"),
        header_cell("Grouped by"),
        header_cell("Columns"),
        header_cell("Mail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Center);
    for (name, definition) in catalog.iter() {
        let sources: Vec<&str> = definition
            .data_sources
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        let group_by = definition
            .aggregation
            .as_ref()
            .map(|a| a.group_by.join(", "))
            .filter(|g| !g.is_empty());
        table.add_row(vec![
            Cell::new(name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(definition.description.as_deref().unwrap_or("-")),
            Cell::new(sources.join(", ")),
            Cell::new(definition.joins.len()),
            group_by.map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(definition.output_columns.join(", ")),
            if definition.sends_individually() {
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
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
