//! Report generation.
//!
//! A report runs through fixed stages on a private copy of its primary table:
//!
//! 1. **Source**: pick `data_sources[0]` from the loaded tables.
//! 2. **Join**: apply each join in declared order.
//! 3. **Aggregate**: group and aggregate when both keys and entries exist.
//! 4. **Project**: keep the declared output columns, in order.
//! 5. **Sort**: order by the sort columns that exist.
//! 6. **Write**: persist the table by the output extension.
//!
//! Only a missing primary source, an empty projection and write failures
//! abort a report. Every other problem skips its stage with a warning.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use rpt_ingest::TableSet;
use rpt_model::{ReportDefinition, SortSpec};
use tracing::{info, warn};

use crate::aggregate::apply_aggregation;
use crate::diagnostics::Diagnostics;
use crate::error::{ReportError, Result};
use crate::join::{apply_join, has_column};
use crate::writer::write_table;

/// A report file that was written.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    /// Stages skipped while building the report.
    pub warnings: Vec<String>,
}

/// Result of a report that did not fail.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    Written(GeneratedReport),
    /// The primary table had no rows; nothing was written.
    Empty,
}

/// Runs one report definition against the loaded tables and writes the
/// result to `output_path`.
pub fn generate_report(
    tables: &TableSet,
    name: &str,
    definition: &ReportDefinition,
    output_path: &Path,
) -> Result<ReportOutcome> {
    let label = definition.label(name);
    info!(report = name, description = label, "generating report");

    let Some(primary) = definition.primary_source() else {
        return Err(ReportError::MissingPrimarySource {
            report: name.to_string(),
            table: None,
        });
    };
    let Some(source) = tables.get(primary) else {
        return Err(ReportError::MissingPrimarySource {
            report: name.to_string(),
            table: Some(primary.to_string()),
        });
    };
    if source.height() == 0 {
        warn!(report = name, table = primary, "primary table is empty, nothing to report");
        return Ok(ReportOutcome::Empty);
    }

    let mut diagnostics = Diagnostics::new(name);
    let mut df = source.clone();

    for join in &definition.joins {
        df = apply_join(df, join, tables, &definition.output_columns, &mut diagnostics);
    }

    if let Some(aggregation) = &definition.aggregation {
        df = apply_aggregation(df, aggregation, &mut diagnostics);
    }

    df = project(df, name, &definition.output_columns, &mut diagnostics)?;

    if let Some(sort) = &definition.sort {
        df = apply_sort(df, sort, &mut diagnostics);
    }

    write_table(&df, output_path)?;
    info!(
        report = name,
        path = %output_path.display(),
        rows = df.height(),
        columns = df.width(),
        "report written"
    );

    Ok(ReportOutcome::Written(GeneratedReport {
        name: name.to_string(),
        path: output_path.to_path_buf(),
        rows: df.height(),
        columns: df.width(),
        warnings: diagnostics.into_warnings(),
    }))
}

/// Keeps the requested columns that exist, in requested order.
fn project(
    df: DataFrame,
    report: &str,
    output_columns: &[String],
    diagnostics: &mut Diagnostics,
) -> Result<DataFrame> {
    if output_columns.is_empty() {
        return Ok(df);
    }
    let mut selected: Vec<&str> = Vec::with_capacity(output_columns.len());
    for name in output_columns {
        if !has_column(&df, name) {
            diagnostics.warn(format!("output column '{name}' not found"));
        } else if !selected.contains(&name.as_str()) {
            selected.push(name);
        }
    }
    if selected.is_empty() {
        return Err(ReportError::EmptyProjection {
            report: report.to_string(),
            requested: output_columns.to_vec(),
        });
    }
    Ok(df.select(selected)?)
}

fn apply_sort(df: DataFrame, sort: &SortSpec, diagnostics: &mut Diagnostics) -> DataFrame {
    let mut by: Vec<&str> = Vec::with_capacity(sort.columns.len());
    for name in &sort.columns {
        if has_column(&df, name) {
            by.push(name);
        } else {
            diagnostics.debug(&format!("sort column '{name}' not found, ignored"));
        }
    }
    if by.is_empty() {
        diagnostics.warn("sort skipped: none of the sort columns exist".to_string());
        return df;
    }

    let options = SortMultipleOptions::default()
        .with_order_descending(!sort.ascending)
        .with_nulls_last(true)
        .with_maintain_order(true);
    match df.sort(by, options) {
        Ok(sorted) => sorted,
        Err(err) => {
            diagnostics.warn(format!("sort failed: {err}"));
            df
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort_spec(columns: &[&str], ascending: bool) -> SortSpec {
        SortSpec {
            columns: columns.iter().map(|s| (*s).to_string()).collect(),
            ascending,
        }
    }

    fn frame() -> DataFrame {
        df! {
            "customer_id" => ["CLI001", "CLI002", "CLI003", "CLI004"],
            "total" => [Some(5.0f64), None, Some(30.0), Some(5.0)],
        }
        .unwrap()
    }

    #[test]
    fn test_sort_descending_nulls_last_stable() {
        let mut diagnostics = Diagnostics::new("test");
        let out = apply_sort(frame(), &sort_spec(&["total", "missing"], false), &mut diagnostics);
        let ids: Vec<String> = (0..out.height())
            .map(|i| rpt_common::any_to_string(out.column("customer_id").unwrap().get(i).unwrap()))
            .collect();
        assert_eq!(ids, vec!["CLI003", "CLI001", "CLI004", "CLI002"]);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_sort_without_existing_columns_skips() {
        let mut diagnostics = Diagnostics::new("test");
        let input = frame();
        let out = apply_sort(input.clone(), &sort_spec(&["nope"], true), &mut diagnostics);
        assert!(out.equals_missing(&input));
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_projection_order_and_missing() {
        let mut diagnostics = Diagnostics::new("test");
        let requested = vec![
            "total".to_string(),
            "region".to_string(),
            "customer_id".to_string(),
            "total".to_string(),
        ];
        let out = project(frame(), "test", &requested, &mut diagnostics).unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["total", "customer_id"]);
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_empty_projection_fails() {
        let mut diagnostics = Diagnostics::new("test");
        let err = project(frame(), "test", &["region".to_string()], &mut diagnostics).unwrap_err();
        assert!(matches!(err, ReportError::EmptyProjection { .. }));
    }
}
