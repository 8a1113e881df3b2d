//! Spreadsheet readers.
//!
//! The reader is chosen from the file extension. Every reader returns a
//! DataFrame whose first row of the file became the column names.

pub mod csv;
pub mod workbook;

use std::path::Path;

use polars::prelude::DataFrame;

use crate::error::{IngestError, Result};

pub use csv::read_csv_table;
pub use workbook::read_workbook_table;

/// Extensions handled by the workbook reader.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Reads an input file into a DataFrame.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv_table(path),
        ext if WORKBOOK_EXTENSIONS.contains(&ext) => read_workbook_table(path),
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_table(&dir.path().join("transactions_2025_06.xlsx")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions_2025_06.json");
        std::fs::write(&path, "{}").unwrap();
        let err = read_table(&path).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedFormat { ref extension, .. } if extension == "json"
        ));
    }
}
