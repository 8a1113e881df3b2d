//! Spreadsheet output.
//!
//! `xlsx` files get a bold header row, numbers as numbers and dates as
//! `YYYY-MM-DD` text. Nulls are left blank. `csv` files go through the
//! polars CSV writer.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;
use rpt_common::{any_to_string, epoch_days_to_date, format_date};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::{ReportError, Result};

/// Output extensions with a writer.
pub const OUTPUT_EXTENSIONS: &[&str] = &["xlsx", "csv"];

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Writes a table to `path`, choosing the format from the extension.
pub fn write_table(df: &DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !OUTPUT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ReportError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    }

    ensure_parent_dir(path)?;
    match extension.as_str() {
        "csv" => write_csv(df, path),
        _ => write_xlsx(df, path),
    }
}

fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = df.clone();
    CsvWriter::new(file).include_header(true).finish(&mut out)?;
    Ok(())
}

fn write_xlsx(df: &DataFrame, path: &Path) -> Result<()> {
    let to_error = |err: XlsxError| ReportError::Xlsx {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col_idx, column) in df.get_columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| ReportError::Xlsx {
            path: path.to_path_buf(),
            message: format!("too many columns ({})", df.width()),
        })?;
        sheet
            .write_string_with_format(0, col, column.name().as_str(), &header)
            .map_err(to_error)?;
        for row_idx in 0..column.len() {
            let row = u32::try_from(row_idx + 1).map_err(|_| ReportError::Xlsx {
                path: path.to_path_buf(),
                message: format!("too many rows ({})", df.height()),
            })?;
            write_cell(sheet, row, col, column.get(row_idx)?).map_err(to_error)?;
        }
    }

    workbook.save(path).map_err(to_error)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: AnyValue<'_>,
) -> std::result::Result<(), XlsxError> {
    match value {
        AnyValue::Null => {}
        AnyValue::Boolean(b) => {
            sheet.write_boolean(row, col, b)?;
        }
        AnyValue::Date(days) => {
            if let Some(date) = epoch_days_to_date(days) {
                sheet.write_string(row, col, format_date(date))?;
            }
        }
        AnyValue::String(s) => {
            sheet.write_string(row, col, s)?;
        }
        AnyValue::StringOwned(s) => {
            sheet.write_string(row, col, s.as_str())?;
        }
        other => match numeric_value(&other) {
            Some(n) if n.is_finite() => {
                sheet.write_number(row, col, n)?;
            }
            Some(_) => {}
            None => {
                sheet.write_string(row, col, any_to_string(other))?;
            }
        },
    }
    Ok(())
}

fn numeric_value(value: &AnyValue<'_>) -> Option<f64> {
    match *value {
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let df = df! { "a" => [1i64] }.unwrap();
        let err = write_table(&df, &dir.path().join("out.pdf")).unwrap_err();
        assert!(matches!(
            err,
            ReportError::UnsupportedFormat { ref extension, .. } if extension == "pdf"
        ));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.xlsx");
        let df = df! {
            "customer_id" => ["CLI001", "CLI002"],
            "total" => [Some(30.0f64), None],
        }
        .unwrap();
        write_table(&df, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_csv_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let df = df! {
            "customer_id" => ["CLI001", "CLI002"],
            "total" => [30.0f64, 5.0],
        }
        .unwrap();
        write_table(&df, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("customer_id,total\n"), "{text}");
        assert!(text.contains("CLI001,30.0"), "{text}");
    }
}
