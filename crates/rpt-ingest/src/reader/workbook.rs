//! Excel and OpenDocument workbook reading via calamine.
//!
//! Only the first worksheet is read. The first row holds the headers; blank
//! headers become `unnamed_<n>` and repeated headers get a `_<n>` suffix so
//! every column name is unique. A column whose non-empty cells are all
//! numeric becomes Float64, anything else becomes String. Spreadsheet dates
//! are rendered as ISO text and typed later by the standardizer.

use std::collections::HashSet;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;
use rpt_common::format_numeric;

use crate::error::{IngestError, Result};

/// Reads the first worksheet of a workbook into a DataFrame.
pub fn read_workbook_table(path: &Path) -> Result<DataFrame> {
    let workbook_error = |message: String| IngestError::WorkbookRead {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(DataFrame::empty());
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| workbook_error(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let headers = unique_headers(header_row);
    let body: Vec<&[Data]> = rows
        .filter(|row| row.iter().any(|cell| !is_blank(cell)))
        .collect();

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet,
        rows = body.len(),
        columns = headers.len(),
        "read worksheet"
    );

    let columns = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| build_column(name, body.iter().map(|row| row.get(idx))))
        .collect::<Vec<Column>>();

    DataFrame::new(columns).map_err(IngestError::from)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => cell_to_string(other).unwrap_or_default(),
    }
}

pub(crate) fn unique_headers(row: &[Data]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(row.len());
    for (idx, cell) in row.iter().enumerate() {
        let base = header_text(cell);
        let base = if base.is_empty() {
            format!("unnamed_{}", idx + 1)
        } else {
            base
        };
        let mut name = base.clone();
        let mut n = 2;
        while seen.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        seen.insert(name.clone());
        headers.push(name);
    }
    headers
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        _ => None,
    }
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(format_numeric(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt.as_datetime().map(|value| {
            if value.time() == chrono::NaiveTime::MIN {
                value.date().format("%Y-%m-%d").to_string()
            } else {
                value.format("%Y-%m-%dT%H:%M:%S").to_string()
            }
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

fn build_column<'a>(name: &str, cells: impl Iterator<Item = Option<&'a Data>> + Clone) -> Column {
    let numeric = cells.clone().flatten().filter(|c| !is_blank(c)).count() > 0
        && cells
            .clone()
            .flatten()
            .filter(|c| !is_blank(c))
            .all(|c| cell_to_f64(c).is_some());

    if numeric {
        let values: Vec<Option<f64>> = cells.map(|c| c.and_then(cell_to_f64)).collect();
        Series::new(name.into(), values).into_column()
    } else {
        let values: Vec<Option<String>> = cells.map(|c| c.and_then(cell_to_string)).collect();
        Series::new(name.into(), values).into_column()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_headers() {
        let row = vec![
            Data::String("Client ID".to_string()),
            Data::Empty,
            Data::String("Amount".to_string()),
            Data::String(" Amount ".to_string()),
            Data::String("Amount".to_string()),
        ];
        assert_eq!(
            unique_headers(&row),
            vec!["Client ID", "unnamed_2", "Amount", "Amount_2", "Amount_3"]
        );
    }

    #[test]
    fn test_numeric_column_detection() {
        let cells = [Data::Float(1.5), Data::Empty, Data::Int(3)];
        let column = build_column("amount", cells.iter().map(Some));
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);

        let cells = [Data::Float(1.5), Data::String("n/a".to_string())];
        let column = build_column("amount", cells.iter().map(Some));
        assert_eq!(column.dtype(), &DataType::String);
    }

    #[test]
    fn test_all_empty_column_is_string() {
        let cells = [Data::Empty, Data::Empty];
        let column = build_column("notes", cells.iter().map(Some));
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.null_count(), 2);
    }
}
