//! Error types for loading input tables and report definitions.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a run's inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input spreadsheet not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension has no reader.
    #[error("unsupported input format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to open or read a workbook.
    #[error("failed to read workbook {path}: {message}")]
    WorkbookRead { path: PathBuf, message: String },

    // === Schema Errors ===
    /// No alias of a canonical field matched a column.
    #[error("table '{table}' has no column for '{field}' (looked for: {})", .aliases.join(", "))]
    MissingColumn {
        table: String,
        field: String,
        aliases: Vec<String>,
    },

    /// An alias matched while a column already carries the canonical name.
    #[error("table '{table}' has both '{column}' and '{field}'")]
    ConflictingColumn {
        table: String,
        field: String,
        column: String,
    },

    // === Data Integrity Errors ===
    /// The primary transactional table is missing or has no rows.
    #[error("primary table '{table}' is empty or was not loaded")]
    EmptyPrimaryTable { table: String },

    // === Definition Errors ===
    /// Report definitions document not found.
    #[error("report definitions not found: {path}")]
    DefinitionsNotFound { path: PathBuf },

    /// Report definitions document is malformed.
    #[error("invalid report definitions in {path}: {message}")]
    DefinitionsParse { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/transactions_2025_06.xlsx"),
        };
        assert_eq!(
            err.to_string(),
            "input file not found: /data/transactions_2025_06.xlsx"
        );
    }

    #[test]
    fn test_missing_column_lists_aliases() {
        let err = IngestError::MissingColumn {
            table: "customers".to_string(),
            field: "customer_id".to_string(),
            aliases: vec!["Customer ID".to_string(), "Client ID".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "table 'customers' has no column for 'customer_id' (looked for: Customer ID, Client ID)"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
